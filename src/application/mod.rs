//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod acquisition;
pub mod camera_manager;
pub mod ports;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases
pub use acquisition::{AcquisitionError, DroppedFile, ImageSource, SourceAcquisition};
pub use camera_manager::CameraManager;
pub use session::{SessionError, SessionSnapshot, SignatureSession, SubmissionOutcome};
