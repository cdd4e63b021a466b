//! Value Objects - Immutable, identity-less domain primitives

mod speech_cache_key;
mod upload_id;
mod voice_type;
mod word;

pub use speech_cache_key::SpeechCacheKey;
pub use upload_id::UploadId;
pub use voice_type::VoiceType;
pub use word::{MAX_WORD_LEN, Word};
