//! Camera port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::camera::{FacingMode, RawFrame};

/// Camera errors
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("Unable to access camera: {0}")]
    DeviceUnavailable(String),

    #[error("Camera is not open")]
    NotOpen,

    #[error("Camera request was superseded")]
    Cancelled,

    #[error("Failed to capture frame: {0}")]
    CaptureFailed(String),
}

/// A live video stream bound to one physical camera.
///
/// Dropping a stream without calling `stop` is allowed; adapters stop their
/// tracks on drop as well.
pub trait VideoStream: Send {
    /// Facing mode the stream was opened with
    fn facing(&self) -> FacingMode;

    /// Current frame at the sensor's native resolution and orientation
    fn snapshot(&self) -> Result<RawFrame, CameraError>;

    /// Stop all underlying tracks. Idempotent. Called from async code, so
    /// it signals and returns; adapters finish any teardown elsewhere.
    fn stop(&mut self);

    /// Whether any track is still running
    fn is_active(&self) -> bool;
}

/// Port for the platform camera capability
#[async_trait]
pub trait Camera: Send + Sync {
    /// Request a video stream constrained to a facing mode.
    ///
    /// # Returns
    /// A live stream, or `CameraError::DeviceUnavailable` when the platform
    /// denies or lacks camera access
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CameraError>;
}
