//! Camera adapter for platforms without a supported capture backend

use async_trait::async_trait;

use crate::application::ports::{Camera, CameraError, VideoStream};
use crate::domain::camera::FacingMode;

/// Camera that always reports the device as unavailable
#[derive(Debug, Clone)]
pub struct UnavailableCamera {
    reason: String,
}

impl UnavailableCamera {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableCamera {
    fn default() -> Self {
        Self::new("no camera backend on this platform")
    }
}

#[async_trait]
impl Camera for UnavailableCamera {
    async fn open(&self, _facing: FacingMode) -> Result<Box<dyn VideoStream>, CameraError> {
        Err(CameraError::DeviceUnavailable(self.reason.clone()))
    }
}
