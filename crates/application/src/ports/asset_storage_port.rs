//! Asset storage port - Interface for durable object storage uploads

use async_trait::async_trait;
use domain::AssetFile;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for uploading asset bytes to a durable store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetStoragePort: Send + Sync {
    /// Upload a file and return its absolute, publicly reachable URL
    ///
    /// # Errors
    /// `Network` for transport failures and timeouts, `Upstream` for
    /// non-success answers, `Decode` if the answer carries no URL.
    async fn upload(&self, file: &AssetFile) -> Result<String, ApplicationError>;
}
