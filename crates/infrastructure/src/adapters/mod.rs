//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod asset_storage_adapter;
mod audio_output_adapter;
mod dictionary_adapter;
mod image_generation_adapter;
mod speech_adapter;

pub use asset_storage_adapter::HttpAssetStorageAdapter;
pub use audio_output_adapter::HeadlessAudioOutput;
pub use dictionary_adapter::DictionaryAdapter;
pub use image_generation_adapter::{
    ImageGenerationAdapter, PlaceholderCardAdapter, map_imaging_error,
};
pub use speech_adapter::SpeechAdapter;

use application::error::ApplicationError;
use reqwest::StatusCode;
use serde_json::Value;

/// Map a transport failure into the application taxonomy
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApplicationError {
    if err.is_decode() {
        ApplicationError::Decode(err.to_string())
    } else if err.is_timeout() {
        ApplicationError::Network(format!("Request timed out: {err}"))
    } else {
        ApplicationError::Network(err.to_string())
    }
}

/// Best human-readable message from an error body
///
/// Looks for `error.message`, `message` or `error` in a JSON body, then falls
/// back to the raw text and finally to the status reason.
pub(crate) fn upstream_message(body: &str, status: StatusCode) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.pointer("/error/message"),
            json.get("message"),
            json.get("error"),
        ];
        if let Some(message) = candidates
            .into_iter()
            .flatten()
            .find_map(Value::as_str)
            .filter(|m| !m.trim().is_empty())
        {
            return message.to_string();
        }
    }

    let text = body.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        text.chars().take(200).collect()
    }
}
