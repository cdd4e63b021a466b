//! Domain entities - Objects with identity and lifecycle

mod audio;
mod card;
mod history_entry;
mod upload_item;

pub use audio::{AudioFormat, SynthesizedAudio};
pub use card::{ArtifactOrigin, CardImage, GenerationRequest, GenerationResult, is_resolvable_asset_url};
pub use history_entry::HistoryEntry;
pub use upload_item::{AssetFile, UploadItem, UploadStatus};
