//! Cache implementations
//!
//! - `MokaAudioCache`: byte-budgeted in-memory store for pronunciation audio

mod moka_cache;

pub use moka_cache::MokaAudioCache;
