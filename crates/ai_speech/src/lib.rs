//! AI Speech - Text-to-Speech for pronunciation audio
//!
//! Provides the `TextToSpeech` trait and a client for the Volcengine
//! OpenSpeech HTTP API.
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the trait (port)
//! - `providers` module contains the concrete implementation (adapter)
//!
//! The provider answers either with a JSON envelope carrying base64 audio or
//! with a raw audio stream; both are decoded into `SynthesizedAudio`.
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{SpeechConfig, TextToSpeech, VolcengineSpeechProvider};
//!
//! let provider = VolcengineSpeechProvider::new(config)?;
//! let audio = provider.synthesize("apple", Some("us")).await?;
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::TextToSpeech;
pub use providers::volcengine::VolcengineSpeechProvider;
pub use types::{SUCCESS_CODE, TtsEnvelope, TtsResponse};
