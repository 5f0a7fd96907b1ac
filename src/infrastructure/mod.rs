//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the digitization service, camera devices and the
//! filesystem.

pub mod camera;
pub mod config;
pub mod digitizer;
pub mod display;

// Re-export adapters
pub use camera::{create_camera, CameraSettings, PlatformCamera, UnavailableCamera};
pub use config::XdgConfigStore;
pub use digitizer::HttpDigitizer;
pub use display::TempDirDisplayStore;
