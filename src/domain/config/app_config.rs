//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::camera::FacingMode;
use crate::domain::timeout::RequestTimeout;
use crate::domain::signature::InkColor;

/// Default base URL of the digitization service
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default capture resolution
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1280;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 720;

/// Camera device configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device index used for the `user` facing mode
    pub user_device: Option<u32>,
    /// Device index used for the `environment` facing mode
    pub environment_device: Option<u32>,
    /// Whether captured frames are mirrored to match the live preview
    pub mirror: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub color: Option<String>,
    pub facing: Option<String>,
    pub timeout: Option<String>,
    pub output_dir: Option<String>,
    pub camera: Option<CameraConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            color: Some(InkColor::default().to_string()),
            facing: Some(FacingMode::default().to_string()),
            timeout: Some(RequestTimeout::default().to_string()),
            output_dir: None,
            camera: Some(CameraConfig {
                user_device: Some(0),
                environment_device: Some(0),
                mirror: Some(true),
                width: Some(DEFAULT_CAPTURE_WIDTH),
                height: Some(DEFAULT_CAPTURE_HEIGHT),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            server_url: other.server_url.or(self.server_url),
            color: other.color.or(self.color),
            facing: other.facing.or(self.facing),
            timeout: other.timeout.or(self.timeout),
            output_dir: other.output_dir.or(self.output_dir),
            camera: Self::merge_camera_config(self.camera, other.camera),
        }
    }

    fn merge_camera_config(
        base: Option<CameraConfig>,
        other: Option<CameraConfig>,
    ) -> Option<CameraConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(CameraConfig {
                user_device: o.user_device.or(b.user_device),
                environment_device: o.environment_device.or(b.environment_device),
                mirror: o.mirror.or(b.mirror),
                width: o.width.or(b.width),
                height: o.height.or(b.height),
            }),
        }
    }

    pub fn server_url_or_default(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get color as parsed InkColor, or default if not set/invalid
    pub fn color_or_default(&self) -> InkColor {
        self.color
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get facing as parsed FacingMode, or default if not set/invalid
    pub fn facing_or_default(&self) -> FacingMode {
        self.facing
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get timeout as parsed RequestTimeout, or default if not set/invalid
    pub fn timeout_or_default(&self) -> RequestTimeout {
        self.timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Device index for a facing mode, or 0 if not set
    pub fn device_for(&self, facing: FacingMode) -> u32 {
        self.camera
            .as_ref()
            .and_then(|c| match facing {
                FacingMode::User => c.user_device,
                FacingMode::Environment => c.environment_device,
            })
            .unwrap_or(0)
    }

    /// Get mirror setting, or true if not set
    pub fn mirror_or_default(&self) -> bool {
        self.camera.as_ref().and_then(|c| c.mirror).unwrap_or(true)
    }

    /// Requested capture resolution
    pub fn resolution_or_default(&self) -> (u32, u32) {
        let camera = self.camera.as_ref();
        (
            camera
                .and_then(|c| c.width)
                .unwrap_or(DEFAULT_CAPTURE_WIDTH),
            camera
                .and_then(|c| c.height)
                .unwrap_or(DEFAULT_CAPTURE_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.server_url.as_deref(), Some(DEFAULT_SERVER_URL));
        assert_eq!(config.color, Some("black".to_string()));
        assert_eq!(config.facing, Some("environment".to_string()));
        assert_eq!(config.timeout, Some("30s".to_string()));
        assert!(config.output_dir.is_none());
        let camera = config.camera.as_ref().unwrap();
        assert_eq!(camera.mirror, Some(true));
        assert_eq!(camera.width, Some(1280));
        assert_eq!(camera.height, Some(720));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.server_url.is_none());
        assert!(config.color.is_none());
        assert!(config.camera.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            server_url: Some("http://base".to_string()),
            color: Some("black".to_string()),
            timeout: Some("10s".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            server_url: Some("http://other".to_string()),
            color: None,
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.server_url.as_deref(), Some("http://other"));
        assert_eq!(merged.color.as_deref(), Some("black"));
        assert_eq!(merged.timeout.as_deref(), Some("10s"));
    }

    #[test]
    fn merge_camera_config_fieldwise() {
        let base = AppConfig {
            camera: Some(CameraConfig {
                user_device: Some(1),
                mirror: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = AppConfig {
            camera: Some(CameraConfig {
                mirror: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.device_for(FacingMode::User), 1);
        assert!(!merged.mirror_or_default());
    }

    #[test]
    fn typed_getters_fall_back_on_invalid() {
        let config = AppConfig {
            color: Some("purple".to_string()),
            facing: Some("sideways".to_string()),
            timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.color_or_default(), InkColor::Black);
        assert_eq!(config.facing_or_default(), FacingMode::Environment);
        assert_eq!(config.timeout_or_default().as_secs(), 30);
    }

    #[test]
    fn typed_getters_parse() {
        let config = AppConfig {
            color: Some("blue".to_string()),
            facing: Some("user".to_string()),
            timeout: Some("1m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.color_or_default(), InkColor::Blue);
        assert_eq!(config.facing_or_default(), FacingMode::User);
        assert_eq!(config.timeout_or_default().as_secs(), 60);
    }

    #[test]
    fn camera_defaults_when_unset() {
        let config = AppConfig::empty();
        assert_eq!(config.device_for(FacingMode::Environment), 0);
        assert!(config.mirror_or_default());
        assert_eq!(config.resolution_or_default(), (1280, 720));
        assert_eq!(config.server_url_or_default(), DEFAULT_SERVER_URL);
    }
}
