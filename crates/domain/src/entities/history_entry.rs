//! Upload history entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UploadItem;

/// A persisted reference to an asset that was used for a successful generation
///
/// Serialized in camelCase with a millisecond timestamp so the stored record
/// stays compatible with the browser-side history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Asset URL; unique within the history
    pub url: String,
    /// Display name of the asset
    pub name: String,
    /// Asset size in bytes
    pub size_bytes: u64,
    /// Asset MIME type
    pub mime_type: String,
    /// When the asset was uploaded
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub uploaded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a new entry stamped with the current time
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
        }
    }

    /// Build an entry for an upload item under the URL it resolved to
    pub fn from_upload(item: &UploadItem, url: impl Into<String>) -> Self {
        Self::new(url, item.name.clone(), item.size_bytes, item.mime_type.clone())
    }
}
