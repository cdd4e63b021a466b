//! Upload item entity
//!
//! Tracks one asset from the moment a local file is accepted until it is
//! reconciled with a durable remote URL (or degraded to an inline reference).

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::UploadId;

/// A local file offered for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Original file name
    pub name: String,
    /// Declared MIME type (e.g. "image/jpeg")
    pub mime_type: String,
    /// File contents
    pub bytes: Bytes,
}

impl AssetFile {
    /// Create a new asset file
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the file contents in bytes
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Upload lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Accepted, local preview available, not yet sent
    Pending,
    /// Bytes are being sent to the durable store
    Uploading,
    /// Durable URL known
    Done,
    /// Durable upload failed; local or inline reference still usable
    Failed,
}

impl UploadStatus {
    /// Whether `commit` may be (re-)invoked from this status
    pub const fn can_start_upload(&self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Uploading => write!(f, "uploading"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// In-flight record for a single asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadItem {
    /// Unique identifier
    pub id: UploadId,
    /// Original file name
    pub name: String,
    /// Process-local preview reference; cleared once released
    pub local_preview_ref: Option<String>,
    /// Durable URL after a successful upload
    pub remote_url: Option<String>,
    /// Self-describing `data:` reference used when the durable store failed
    pub inline_ref: Option<String>,
    /// Current lifecycle status
    pub status: UploadStatus,
    /// File size in bytes
    pub size_bytes: u64,
    /// MIME type of the file
    pub mime_type: String,
    /// When the file was accepted
    pub accepted_at: DateTime<Utc>,
    /// Message of the most recent non-fatal upload error
    pub last_error: Option<String>,
}

impl UploadItem {
    /// Create a pending item for an accepted file
    pub fn new_pending(id: UploadId, file: &AssetFile, local_preview_ref: impl Into<String>) -> Self {
        Self {
            id,
            name: file.name.clone(),
            local_preview_ref: Some(local_preview_ref.into()),
            remote_url: None,
            inline_ref: None,
            status: UploadStatus::Pending,
            size_bytes: file.size_bytes(),
            mime_type: file.mime_type.clone(),
            accepted_at: Utc::now(),
            last_error: None,
        }
    }

    /// Mark the upload as in progress
    ///
    /// # Errors
    /// Fails if the item is already uploading or done.
    pub fn start_upload(&mut self) -> Result<(), DomainError> {
        if !self.status.can_start_upload() {
            return Err(DomainError::InvalidTransition(format!(
                "cannot upload item {} in status {}",
                self.id, self.status
            )));
        }
        self.status = UploadStatus::Uploading;
        Ok(())
    }

    /// Record the durable URL
    ///
    /// Returns the local preview reference that is no longer needed so the
    /// caller can release it.
    ///
    /// # Errors
    /// Fails unless the item is uploading.
    pub fn complete_upload(&mut self, remote_url: impl Into<String>) -> Result<Option<String>, DomainError> {
        if self.status != UploadStatus::Uploading {
            return Err(DomainError::InvalidTransition(format!(
                "cannot complete item {} in status {}",
                self.id, self.status
            )));
        }
        self.remote_url = Some(remote_url.into());
        self.status = UploadStatus::Done;
        self.last_error = None;
        Ok(self.local_preview_ref.take())
    }

    /// Record a failed upload, keeping the preview and attaching an inline fallback
    ///
    /// # Errors
    /// Fails unless the item is uploading.
    pub fn fail_upload(
        &mut self,
        error: impl Into<String>,
        inline_ref: Option<String>,
    ) -> Result<(), DomainError> {
        if self.status != UploadStatus::Uploading {
            return Err(DomainError::InvalidTransition(format!(
                "cannot fail item {} in status {}",
                self.id, self.status
            )));
        }
        self.status = UploadStatus::Failed;
        self.last_error = Some(error.into());
        if inline_ref.is_some() {
            self.inline_ref = inline_ref;
        }
        Ok(())
    }

    /// Best usable reference: remote URL, then inline data, then local preview
    pub fn resolve(&self) -> Option<&str> {
        self.remote_url
            .as_deref()
            .or(self.inline_ref.as_deref())
            .or(self.local_preview_ref.as_deref())
    }

    /// Whether the item has reached a terminal status for this attempt
    pub const fn is_settled(&self) -> bool {
        matches!(self.status, UploadStatus::Done | UploadStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> AssetFile {
        AssetFile::new("cat.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn pending() -> UploadItem {
        UploadItem::new_pending(UploadId::new(), &jpeg(), "preview://abc")
    }

    #[test]
    fn new_item_is_pending_with_preview() {
        let item = pending();
        assert_eq!(item.status, UploadStatus::Pending);
        assert_eq!(item.size_bytes, 4);
        assert_eq!(item.mime_type, "image/jpeg");
        assert_eq!(item.resolve(), Some("preview://abc"));
    }

    #[test]
    fn completing_releases_preview_and_resolves_remote() {
        let mut item = pending();
        item.start_upload().unwrap();
        let released = item.complete_upload("https://cdn.example/cat.jpg").unwrap();

        assert_eq!(released.as_deref(), Some("preview://abc"));
        assert_eq!(item.status, UploadStatus::Done);
        assert!(item.local_preview_ref.is_none());
        assert_eq!(item.resolve(), Some("https://cdn.example/cat.jpg"));
    }

    #[test]
    fn failure_keeps_preview_and_prefers_inline() {
        let mut item = pending();
        item.start_upload().unwrap();
        item.fail_upload("connection refused", Some("data:image/jpeg;base64,AA==".into()))
            .unwrap();

        assert_eq!(item.status, UploadStatus::Failed);
        assert_eq!(item.local_preview_ref.as_deref(), Some("preview://abc"));
        assert_eq!(item.resolve(), Some("data:image/jpeg;base64,AA=="));
        assert_eq!(item.last_error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn failed_item_may_be_retried() {
        let mut item = pending();
        item.start_upload().unwrap();
        item.fail_upload("timeout", None).unwrap();
        assert!(item.start_upload().is_ok());
    }

    #[test]
    fn done_item_cannot_restart() {
        let mut item = pending();
        item.start_upload().unwrap();
        item.complete_upload("https://cdn.example/a.jpg").unwrap();
        assert!(item.start_upload().is_err());
    }

    #[test]
    fn completing_without_start_is_rejected() {
        let mut item = pending();
        assert!(item.complete_upload("https://cdn.example/a.jpg").is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&UploadStatus::Uploading).unwrap();
        assert_eq!(json, "\"uploading\"");
    }
}
