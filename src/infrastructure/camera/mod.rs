//! Camera infrastructure module
//!
//! Uses V4L2 on Linux. Other platforms get a camera that always reports
//! the device as unavailable.

mod unavailable;
#[cfg(target_os = "linux")]
mod v4l2;
mod yuyv;

pub use unavailable::UnavailableCamera;
#[cfg(target_os = "linux")]
pub use v4l2::{V4l2Camera, V4l2Stream};
pub use yuyv::yuyv_to_frame;

use crate::domain::camera::FacingMode;
use crate::domain::config::AppConfig;

/// Camera used on this platform
#[cfg(target_os = "linux")]
pub type PlatformCamera = V4l2Camera;
#[cfg(not(target_os = "linux"))]
pub type PlatformCamera = UnavailableCamera;

/// Device selection and capture size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSettings {
    pub user_device: u32,
    pub environment_device: u32,
    pub width: u32,
    pub height: u32,
}

impl CameraSettings {
    /// Settings from a merged config
    pub fn from_config(config: &AppConfig) -> Self {
        let (width, height) = config.resolution_or_default();
        Self {
            user_device: config.device_for(FacingMode::User),
            environment_device: config.device_for(FacingMode::Environment),
            width,
            height,
        }
    }

    /// Device index for a facing mode
    pub fn device_for(&self, facing: FacingMode) -> u32 {
        match facing {
            FacingMode::User => self.user_device,
            FacingMode::Environment => self.environment_device,
        }
    }
}

/// Create the camera for this platform
#[cfg(target_os = "linux")]
pub fn create_camera(settings: CameraSettings) -> PlatformCamera {
    V4l2Camera::new(settings)
}

/// Create the camera for this platform
#[cfg(not(target_os = "linux"))]
pub fn create_camera(_settings: CameraSettings) -> PlatformCamera {
    UnavailableCamera::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::CameraConfig;

    #[test]
    fn settings_follow_config() {
        let config = AppConfig {
            camera: Some(CameraConfig {
                user_device: Some(1),
                environment_device: Some(2),
                width: Some(640),
                height: Some(480),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = CameraSettings::from_config(&config);
        assert_eq!(settings.device_for(FacingMode::User), 1);
        assert_eq!(settings.device_for(FacingMode::Environment), 2);
        assert_eq!((settings.width, settings.height), (640, 480));
    }

    #[test]
    fn settings_default_to_first_device() {
        let settings = CameraSettings::from_config(&AppConfig::empty());
        assert_eq!(settings.user_device, 0);
        assert_eq!(settings.environment_device, 0);
        assert_eq!((settings.width, settings.height), (1280, 720));
    }
}
