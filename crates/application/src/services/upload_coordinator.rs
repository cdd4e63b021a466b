//! Asset upload coordinator
//!
//! Accepts local files, hands out an immediately displayable preview
//! reference and reconciles it with a durable URL in the background. A
//! failed upload is never fatal: the item degrades to an inline `data:`
//! reference (when enabled) or keeps its local preview.

use std::{collections::HashMap, fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use domain::{AssetFile, DomainError, UploadId, UploadItem, ValidationKind};
use futures::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use super::LocalPreviewRegistry;
use crate::{error::ApplicationError, ports::AssetStoragePort};

/// Default maximum upload size (2 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Image types accepted by default
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Acceptance rules for uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Files must be strictly smaller than this
    pub max_size_bytes: u64,
    /// Allowed MIME types (exact match, case-insensitive)
    pub allowed_mime_types: Vec<String>,
    /// Embed bytes as a `data:` reference when the durable store fails
    pub inline_fallback: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
            inline_fallback: true,
        }
    }
}

impl UploadPolicy {
    /// Check a file against the policy
    ///
    /// # Errors
    /// `BadType` if the MIME type is not allowed, `TooLarge` if the file is
    /// not strictly smaller than the limit.
    pub fn check(&self, file: &AssetFile) -> Result<(), DomainError> {
        let mime = file.mime_type.trim();
        if !self
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
        {
            return Err(DomainError::validation(
                ValidationKind::BadType,
                format!("{} has unsupported type '{mime}'", file.name),
            ));
        }
        if file.size_bytes() >= self.max_size_bytes {
            return Err(DomainError::validation(
                ValidationKind::TooLarge,
                format!(
                    "{} is {} bytes, limit is {} bytes",
                    file.name,
                    file.size_bytes(),
                    self.max_size_bytes
                ),
            ));
        }
        Ok(())
    }
}

/// Outcome of a commit attempt
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// The durable store returned a URL
    Uploaded {
        /// Absolute durable URL
        url: String,
    },
    /// The durable store failed; the item still resolves to a fallback
    Degraded {
        /// Inline or local reference the item now resolves to
        reference: String,
        /// Non-fatal upload error
        error: ApplicationError,
    },
}

impl CommitOutcome {
    /// Reference to use for this item after the commit
    pub fn reference(&self) -> &str {
        match self {
            Self::Uploaded { url } => url,
            Self::Degraded { reference, .. } => reference,
        }
    }

    /// Whether the durable store accepted the file
    pub const fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }
}

struct TrackedUpload {
    item: UploadItem,
    file: AssetFile,
}

/// Coordinates local acceptance and durable upload of assets
pub struct AssetUploadCoordinator {
    storage: Arc<dyn AssetStoragePort>,
    previews: Arc<LocalPreviewRegistry>,
    policy: UploadPolicy,
    items: RwLock<HashMap<UploadId, TrackedUpload>>,
}

impl fmt::Debug for AssetUploadCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetUploadCoordinator")
            .field("policy", &self.policy)
            .field("items", &self.items.read().len())
            .finish_non_exhaustive()
    }
}

impl AssetUploadCoordinator {
    /// Create a coordinator with the default policy
    pub fn new(storage: Arc<dyn AssetStoragePort>, previews: Arc<LocalPreviewRegistry>) -> Self {
        Self::with_policy(storage, previews, UploadPolicy::default())
    }

    /// Create a coordinator with a custom policy
    pub fn with_policy(
        storage: Arc<dyn AssetStoragePort>,
        previews: Arc<LocalPreviewRegistry>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            storage,
            previews,
            policy,
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Active policy
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Registry backing the preview references
    pub fn previews(&self) -> &Arc<LocalPreviewRegistry> {
        &self.previews
    }

    /// Validate a file and create a pending item with a local preview
    ///
    /// No network call is made.
    ///
    /// # Errors
    /// Returns a validation error (`BadType` or `TooLarge`).
    #[instrument(skip(self, file), fields(name = %file.name, size = file.size_bytes(), mime = %file.mime_type))]
    pub fn accept(&self, file: AssetFile) -> Result<UploadItem, ApplicationError> {
        self.policy.check(&file)?;

        let preview = self.previews.register(&file);
        let item = UploadItem::new_pending(UploadId::new(), &file, preview);
        debug!(id = %item.id, "Accepted upload");

        self.items.write().insert(
            item.id,
            TrackedUpload {
                item: item.clone(),
                file,
            },
        );
        Ok(item)
    }

    /// Upload the item's bytes to the durable store
    ///
    /// Upload failures are reported as [`CommitOutcome::Degraded`], not as
    /// errors. Callers may re-invoke `commit` on a degraded item.
    ///
    /// # Errors
    /// `NotFound` for unknown or discarded items, a domain transition error
    /// if the item is already uploading or done.
    #[instrument(skip(self))]
    pub async fn commit(&self, id: UploadId) -> Result<CommitOutcome, ApplicationError> {
        let file = {
            let mut items = self.items.write();
            let tracked = items.get_mut(&id).ok_or_else(|| not_found(id))?;
            tracked.item.start_upload()?;
            tracked.file.clone()
        };

        match self.storage.upload(&file).await {
            Ok(url) => {
                let released = {
                    let mut items = self.items.write();
                    let tracked = items.get_mut(&id).ok_or_else(|| not_found(id))?;
                    tracked.item.complete_upload(url.clone())?
                };
                if let Some(reference) = released {
                    self.previews.release(&reference);
                }
                info!(%id, %url, "Upload committed");
                Ok(CommitOutcome::Uploaded { url })
            },
            Err(error) => {
                warn!(%id, error = %error, "Upload failed, degrading to local reference");
                let inline = self.policy.inline_fallback.then(|| inline_data_ref(&file));

                let mut items = self.items.write();
                let tracked = items.get_mut(&id).ok_or_else(|| not_found(id))?;
                tracked.item.fail_upload(error.to_string(), inline)?;
                let reference = tracked
                    .item
                    .resolve()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ApplicationError::Internal(format!("upload {id} has no usable reference"))
                    })?;
                Ok(CommitOutcome::Degraded { reference, error })
            },
        }
    }

    /// Commit several items concurrently
    ///
    /// Results are returned in input order.
    pub async fn commit_all(
        &self,
        ids: &[UploadId],
    ) -> Vec<(UploadId, Result<CommitOutcome, ApplicationError>)> {
        let results = join_all(ids.iter().map(|id| self.commit(*id))).await;
        ids.iter().copied().zip(results).collect()
    }

    /// Best usable reference for an item, if it is known
    pub fn resolve(&self, id: UploadId) -> Option<String> {
        self.items
            .read()
            .get(&id)
            .and_then(|tracked| tracked.item.resolve().map(str::to_string))
    }

    /// Snapshot of an item
    pub fn get(&self, id: UploadId) -> Option<UploadItem> {
        self.items.read().get(&id).map(|tracked| tracked.item.clone())
    }

    /// Abandon an item and release its preview
    ///
    /// Returns whether the item existed. An in-flight commit for a
    /// discarded item finishes with `NotFound`.
    pub fn discard(&self, id: UploadId) -> bool {
        let removed = self.items.write().remove(&id);
        match removed {
            Some(tracked) => {
                if let Some(reference) = tracked.item.local_preview_ref.as_deref() {
                    self.previews.release(reference);
                }
                debug!(%id, "Discarded upload");
                true
            },
            None => false,
        }
    }

    /// Number of tracked items
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether no items are tracked
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

fn not_found(id: UploadId) -> ApplicationError {
    ApplicationError::NotFound(format!("upload {id}"))
}

/// Self-describing inline reference for a file
pub fn inline_data_ref(file: &AssetFile) -> String {
    format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes))
}

#[cfg(test)]
mod tests {
    use domain::UploadStatus;

    use super::*;
    use crate::ports::MockAssetStoragePort;

    fn jpeg(size: usize) -> AssetFile {
        AssetFile::new("photo.jpg", "image/jpeg", vec![0xAB; size])
    }

    fn coordinator(storage: MockAssetStoragePort) -> AssetUploadCoordinator {
        AssetUploadCoordinator::new(Arc::new(storage), Arc::new(LocalPreviewRegistry::new()))
    }

    #[test]
    fn accept_returns_pending_item_with_preview() {
        let coordinator = coordinator(MockAssetStoragePort::new());
        let item = coordinator.accept(jpeg(150 * 1024)).unwrap();

        assert_eq!(item.status, UploadStatus::Pending);
        let reference = coordinator.resolve(item.id).unwrap();
        assert!(LocalPreviewRegistry::is_preview_ref(&reference));
        assert!(coordinator.previews().get(&reference).is_some());
    }

    #[test]
    fn accept_rejects_bad_type() {
        let coordinator = coordinator(MockAssetStoragePort::new());
        let err = coordinator
            .accept(AssetFile::new("a.txt", "text/plain", vec![1]))
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::BadType));
        assert!(coordinator.is_empty());
    }

    #[test]
    fn accept_rejects_file_at_limit() {
        let coordinator = coordinator(MockAssetStoragePort::new());
        let err = coordinator
            .accept(jpeg(DEFAULT_MAX_UPLOAD_BYTES as usize))
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::TooLarge));

        assert!(coordinator.accept(jpeg(DEFAULT_MAX_UPLOAD_BYTES as usize - 1)).is_ok());
    }

    #[test]
    fn mime_type_check_ignores_case() {
        let policy = UploadPolicy::default();
        assert!(policy.check(&AssetFile::new("a.png", "IMAGE/PNG", vec![1])).is_ok());
    }

    #[tokio::test]
    async fn commit_success_replaces_preview_with_remote_url() {
        let mut storage = MockAssetStoragePort::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_| Ok("https://cdn.example/photo.jpg".to_string()));
        let coordinator = coordinator(storage);

        let item = coordinator.accept(jpeg(100)).unwrap();
        let outcome = coordinator.commit(item.id).await.unwrap();

        assert!(outcome.is_uploaded());
        assert_eq!(
            coordinator.resolve(item.id).as_deref(),
            Some("https://cdn.example/photo.jpg")
        );
        let snapshot = coordinator.get(item.id).unwrap();
        assert_eq!(snapshot.status, UploadStatus::Done);
        assert!(snapshot.local_preview_ref.is_none());
        assert!(coordinator.previews().is_empty());
    }

    #[tokio::test]
    async fn commit_failure_degrades_to_inline_reference() {
        let mut storage = MockAssetStoragePort::new();
        storage
            .expect_upload()
            .returning(|_| Err(ApplicationError::Network("connection refused".into())));
        let coordinator = coordinator(storage);

        let item = coordinator.accept(jpeg(3)).unwrap();
        let outcome = coordinator.commit(item.id).await.unwrap();

        match &outcome {
            CommitOutcome::Degraded { reference, error } => {
                assert_eq!(reference, "data:image/jpeg;base64,q6ur");
                assert!(error.is_fallback_eligible());
            },
            CommitOutcome::Uploaded { .. } => panic!("expected degraded outcome"),
        }
        let snapshot = coordinator.get(item.id).unwrap();
        assert_eq!(snapshot.status, UploadStatus::Failed);
        assert!(snapshot.local_preview_ref.is_some());
        assert_eq!(coordinator.resolve(item.id).as_deref(), Some(outcome.reference()));
    }

    #[tokio::test]
    async fn commit_failure_without_inline_keeps_preview() {
        let mut storage = MockAssetStoragePort::new();
        storage
            .expect_upload()
            .returning(|_| Err(ApplicationError::upstream(Some(500), "boom")));
        let coordinator = AssetUploadCoordinator::with_policy(
            Arc::new(storage),
            Arc::new(LocalPreviewRegistry::new()),
            UploadPolicy {
                inline_fallback: false,
                ..UploadPolicy::default()
            },
        );

        let item = coordinator.accept(jpeg(10)).unwrap();
        let outcome = coordinator.commit(item.id).await.unwrap();
        assert!(LocalPreviewRegistry::is_preview_ref(outcome.reference()));
    }

    #[tokio::test]
    async fn failed_commit_can_be_retried() {
        let mut storage = MockAssetStoragePort::new();
        let mut seq = mockall::Sequence::new();
        storage
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ApplicationError::Network("timeout".into())));
        storage
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("https://cdn.example/retry.jpg".to_string()));
        let coordinator = coordinator(storage);

        let item = coordinator.accept(jpeg(10)).unwrap();
        assert!(!coordinator.commit(item.id).await.unwrap().is_uploaded());
        assert!(coordinator.commit(item.id).await.unwrap().is_uploaded());
        assert_eq!(
            coordinator.resolve(item.id).as_deref(),
            Some("https://cdn.example/retry.jpg")
        );
    }

    #[tokio::test]
    async fn committing_done_item_is_rejected() {
        let mut storage = MockAssetStoragePort::new();
        storage
            .expect_upload()
            .times(1)
            .returning(|_| Ok("https://cdn.example/a.jpg".to_string()));
        let coordinator = coordinator(storage);

        let item = coordinator.accept(jpeg(10)).unwrap();
        coordinator.commit(item.id).await.unwrap();
        assert!(coordinator.commit(item.id).await.is_err());
    }

    #[tokio::test]
    async fn commit_unknown_item_is_not_found() {
        let coordinator = coordinator(MockAssetStoragePort::new());
        let err = coordinator.commit(UploadId::new()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn commit_all_keeps_input_order() {
        let mut storage = MockAssetStoragePort::new();
        storage
            .expect_upload()
            .times(2)
            .returning(|file| Ok(format!("https://cdn.example/{}", file.name)));
        let coordinator = coordinator(storage);

        let first = coordinator
            .accept(AssetFile::new("one.png", "image/png", vec![1]))
            .unwrap();
        let second = coordinator
            .accept(AssetFile::new("two.png", "image/png", vec![2]))
            .unwrap();

        let results = coordinator.commit_all(&[first.id, second.id]).await;
        assert_eq!(results[0].0, first.id);
        assert_eq!(
            results[1].1.as_ref().unwrap().reference(),
            "https://cdn.example/two.png"
        );
    }

    #[test]
    fn discard_releases_preview() {
        let coordinator = coordinator(MockAssetStoragePort::new());
        let item = coordinator.accept(jpeg(10)).unwrap();

        assert!(coordinator.discard(item.id));
        assert!(coordinator.previews().is_empty());
        assert!(coordinator.resolve(item.id).is_none());
        assert!(!coordinator.discard(item.id));
    }
}
