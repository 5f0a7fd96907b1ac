//! Camera session entity

use super::FacingMode;

/// Camera session entity.
/// Tracks the facing mode and whether the camera overlay is open. Every
/// open request and every close bumps a generation counter so a stream that
/// arrives for an outdated request can be recognised and stopped.
///
/// State machine:
///   CLOSED -> OPEN (request_open)
///   OPEN -> OPEN (request_open, toggle_facing; prior stream superseded)
///   OPEN -> CLOSED (close)
#[derive(Debug, Clone, Default)]
pub struct CameraSession {
    facing: FacingMode,
    open: bool,
    generation: u64,
}

/// Outcome of a facing-mode toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacingToggle {
    /// Facing mode after the toggle
    pub facing: FacingMode,
    /// Whether the camera is open and must be re-opened with the new mode
    pub reopen: bool,
}

impl CameraSession {
    /// Create a closed session with the given initial facing mode
    pub fn new(facing: FacingMode) -> Self {
        Self {
            facing,
            open: false,
            generation: 0,
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record an open request and return its generation
    pub fn request_open(&mut self, facing: FacingMode) -> u64 {
        self.facing = facing;
        self.open = true;
        self.generation += 1;
        self.generation
    }

    /// Whether a stream requested under `generation` is still wanted
    pub fn is_current(&self, generation: u64) -> bool {
        self.open && self.generation == generation
    }

    /// Close the overlay. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        self.generation += 1;
        was_open
    }

    /// Flip the facing mode
    pub fn toggle_facing(&mut self) -> FacingToggle {
        self.facing = self.facing.flipped();
        FacingToggle {
            facing: self.facing,
            reopen: self.open,
        }
    }
}
