//! Camera domain module

mod camera_session;
mod facing_mode;
mod frame;

pub use camera_session::{CameraSession, FacingToggle};
pub use facing_mode::FacingMode;
pub use frame::{FrameError, RawFrame};
