//! Process-local preview references for accepted files

use std::{collections::HashMap, fmt};

use domain::AssetFile;
use parking_lot::RwLock;
use uuid::Uuid;

/// Scheme of references handed out by [`LocalPreviewRegistry`]
pub const PREVIEW_SCHEME: &str = "preview://";

/// Holds the bytes behind `preview://` references until they are released
///
/// References are usable for display inside this process only; they are
/// never resolvable by remote services.
#[derive(Default)]
pub struct LocalPreviewRegistry {
    entries: RwLock<HashMap<String, AssetFile>>,
}

impl fmt::Debug for LocalPreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPreviewRegistry")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

impl LocalPreviewRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its preview reference
    pub fn register(&self, file: &AssetFile) -> String {
        let reference = format!("{PREVIEW_SCHEME}{}", Uuid::new_v4());
        self.entries.write().insert(reference.clone(), file.clone());
        reference
    }

    /// Look up the file behind a reference
    pub fn get(&self, reference: &str) -> Option<AssetFile> {
        self.entries.read().get(reference).cloned()
    }

    /// Release a reference; returns whether it was live
    pub fn release(&self, reference: &str) -> bool {
        self.entries.write().remove(reference).is_some()
    }

    /// Number of live references
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no references are live
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether a string is a preview reference
    pub fn is_preview_ref(reference: &str) -> bool {
        reference.starts_with(PREVIEW_SCHEME)
    }
}
