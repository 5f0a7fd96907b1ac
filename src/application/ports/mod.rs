//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod camera;
pub mod config;
pub mod digitizer;
pub mod display;

// Re-export common types
pub use camera::{Camera, CameraError, VideoStream};
pub use config::ConfigStore;
pub use digitizer::{Digitizer, ProcessingFailure, GENERIC_FAILURE_MESSAGE};
pub use display::{DisplayError, DisplayStore};
