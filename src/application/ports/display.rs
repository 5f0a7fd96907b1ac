//! Display store port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::signature::DisplayHandle;

/// Display store errors
#[derive(Debug, Clone, Error)]
pub enum DisplayError {
    #[error("Failed to publish image: {0}")]
    PublishFailed(String),
}

/// Port for renderable image handles (previews and results).
/// Every published handle holds a resource until released.
#[async_trait]
pub trait DisplayStore: Send + Sync {
    /// Make bytes renderable and return a handle to them
    async fn publish(&self, bytes: &[u8], file_name: &str) -> Result<DisplayHandle, DisplayError>;

    /// Reclaim the resource behind a handle. Unknown handles are ignored.
    async fn release(&self, handle: &DisplayHandle);

    /// Number of handles currently holding a resource
    fn live_count(&self) -> usize;
}
