//! Domain layer for WordCardForge
//!
//! Contains the vocabulary of the flashcard media pipeline: uploaded assets,
//! history entries, generated card artifacts and synthesized audio.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, ValidationKind};
pub use value_objects::*;
