//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod camera;
pub mod config;
pub mod error;
pub mod signature;
pub mod session;
pub mod timeout;

// Re-export common types
pub use camera::{CameraSession, FacingMode, RawFrame};
pub use config::AppConfig;
pub use error::*;
pub use signature::{AcquiredImage, DigitizationResult, DisplayHandle, ImageData, InkColor};
pub use session::{AcquisitionSession, SessionPhase};
pub use timeout::RequestTimeout;
