//! Digitization port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::signature::{ImageData, InkColor};

/// Fallback message when the service gives no usable error body
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process image";

/// A failed digitization, whether the service rejected the image or no
/// response arrived at all. `status` is set only for service responses.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProcessingFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ProcessingFailure {
    /// Failure reported by the service
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure before any response arrived
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

/// Port for the remote digitization service
#[async_trait]
pub trait Digitizer: Send + Sync {
    /// Submit an image with an ink color.
    ///
    /// # Returns
    /// The processed image payload (opaque bytes) or a failure
    async fn digitize(
        &self,
        image: &ImageData,
        color: InkColor,
    ) -> Result<Vec<u8>, ProcessingFailure>;
}
