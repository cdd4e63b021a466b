//! Speech provider implementations

pub mod volcengine;
