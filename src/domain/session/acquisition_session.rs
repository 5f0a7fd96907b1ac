//! Acquisition session state machine

use std::fmt;
use thiserror::Error;

use crate::domain::signature::{
    AcquiredImage, DigitizationResult, DisplayHandle, ImageData, InkColor,
};

/// Session phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    /// No image acquired
    #[default]
    Idle,
    /// Image acquired, no result yet (or result cleared)
    Previewing,
    /// Submission in flight
    Processing,
    /// Processed image available
    Result,
    /// Last operation failed, message held
    Error,
}

impl SessionPhase {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Previewing => "previewing",
            Self::Processing => "processing",
            Self::Result => "result",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a submission could not begin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionRejected {
    #[error("Cannot digitize: no image has been acquired")]
    NoImage,

    #[error("Cannot digitize: a digitization is already in progress")]
    AlreadyProcessing,
}

/// What started a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Explicit digitize request; refused while processing
    User,
    /// Ink color changed while an image is present; supersedes any in-flight submission
    ParameterChange,
}

/// The image/parameter pairing captured when a submission begins.
/// `episode` identifies the Processing episode the response belongs to.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub episode: u64,
    pub image: ImageData,
    pub color: InkColor,
}

/// A started submission plus the handles it invalidated
#[derive(Debug)]
pub struct Submission {
    pub ticket: SubmissionTicket,
    pub released: Vec<DisplayHandle>,
}

/// How a response was applied
#[derive(Debug, PartialEq, Eq)]
pub enum Completion {
    /// Response belongs to the current episode and is now displayed
    Applied,
    /// Response belongs to a superseded episode; its handle must be released
    Stale(DisplayHandle),
}

/// Acquisition session entity.
/// Owns the acquired image, the digitization result and the error message,
/// and decides which responses are authoritative.
///
/// State machine:
///   any -> PREVIEWING (acquire)
///   PREVIEWING/RESULT/ERROR -> PROCESSING (begin_submission, change_color)
///   PROCESSING -> PROCESSING (change_color; prior episode superseded)
///   PROCESSING -> RESULT (complete, current episode only)
///   PROCESSING -> ERROR (fail, current episode only)
///   any -> ERROR (fail_acquisition)
///   any -> IDLE (reset)
#[derive(Debug, Default)]
pub struct AcquisitionSession {
    phase: SessionPhase,
    color: InkColor,
    image: Option<AcquiredImage>,
    result: Option<DigitizationResult>,
    error: Option<String>,
    episode: u64,
}

impl AcquisitionSession {
    /// Create an idle session with the given ink color
    pub fn new(color: InkColor) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn image(&self) -> Option<&AcquiredImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&DigitizationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current episode token
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.phase == SessionPhase::Processing
    }

    /// Store a new image, invalidating the previous preview, any result and
    /// any in-flight submission. Returns the handles to release.
    pub fn acquire(&mut self, image: AcquiredImage) -> Vec<DisplayHandle> {
        let mut released = self.take_result();
        if let Some(previous) = self.image.replace(image) {
            released.push(previous.into_preview());
        }
        self.error = None;
        self.episode += 1;
        self.phase = SessionPhase::Previewing;
        released
    }

    /// Begin a Processing episode for the current image and color
    pub fn begin_submission(
        &mut self,
        trigger: SubmitTrigger,
    ) -> Result<Submission, SubmissionRejected> {
        let image = self
            .image
            .as_ref()
            .map(|acquired| acquired.data().clone())
            .ok_or(SubmissionRejected::NoImage)?;

        if trigger == SubmitTrigger::User && self.is_processing() {
            return Err(SubmissionRejected::AlreadyProcessing);
        }

        let released = self.take_result();
        self.error = None;
        self.episode += 1;
        self.phase = SessionPhase::Processing;

        Ok(Submission {
            ticket: SubmissionTicket {
                episode: self.episode,
                image,
                color: self.color,
            },
            released,
        })
    }

    /// Set the ink color. When it changed and an image is present, a
    /// resubmission begins with the new color.
    pub fn change_color(&mut self, color: InkColor) -> Option<Submission> {
        if color == self.color {
            return None;
        }
        self.color = color;
        self.begin_submission(SubmitTrigger::ParameterChange).ok()
    }

    /// Apply a successful response
    pub fn complete(&mut self, episode: u64, result: DigitizationResult) -> Completion {
        if episode != self.episode || !self.has_image() {
            return Completion::Stale(result.into_handle());
        }
        self.result = Some(result);
        self.error = None;
        self.phase = SessionPhase::Result;
        Completion::Applied
    }

    /// Apply a failed response. Returns false when the episode is stale.
    pub fn fail(&mut self, episode: u64, message: impl Into<String>) -> bool {
        if episode != self.episode || !self.has_image() {
            return false;
        }
        self.error = Some(message.into());
        self.phase = SessionPhase::Error;
        true
    }

    /// Record a failure that happened while acquiring (e.g. camera denied).
    /// The held image, if any, is kept so the user can still digitize it.
    pub fn fail_acquisition(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = SessionPhase::Error;
    }

    /// Back to idle, releasing everything
    pub fn reset(&mut self) -> Vec<DisplayHandle> {
        let mut released = self.take_result();
        if let Some(image) = self.image.take() {
            released.push(image.into_preview());
        }
        self.error = None;
        self.episode += 1;
        self.phase = SessionPhase::Idle;
        released
    }

    fn take_result(&mut self) -> Vec<DisplayHandle> {
        self.result
            .take()
            .map(|result| vec![result.into_handle()])
            .unwrap_or_default()
    }
}
