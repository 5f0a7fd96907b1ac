//! Signature session use case
//!
//! Coordinates source acquisition, the camera, the digitization service
//! and the display store around one `AcquisitionSession`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::camera::FacingMode;
use crate::domain::session::{
    AcquisitionSession, Completion, SessionPhase, SubmissionRejected, SubmissionTicket,
    SubmitTrigger,
};
use crate::domain::signature::{
    AcquiredImage, DigitizationResult, DisplayHandle, ImageData, InkColor, EXPORT_FILE_NAME,
};

use super::acquisition::{AcquisitionError, ImageSource, SourceAcquisition};
use super::camera_manager::CameraManager;
use super::ports::{Camera, CameraError, Digitizer, DisplayError, DisplayStore};

/// Errors from the session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] SubmissionRejected),

    #[error("No digitized result to export")]
    NoResult,

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error("Failed to export result: {0}")]
    Export(String),
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Result is now displayed
    Completed(DisplayHandle),
    /// Service or transport failure, now held as the session error
    Failed(String),
    /// A newer episode began before the response arrived; it was discarded
    Superseded,
}

/// Point-in-time view of the session for presentation
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub color: InkColor,
    pub facing: FacingMode,
    pub camera_open: bool,
    pub image_name: Option<String>,
    pub image_size: Option<String>,
    pub preview: Option<PathBuf>,
    pub result: Option<PathBuf>,
    pub result_size: Option<String>,
    pub error: Option<String>,
    pub episode: u64,
}

impl SessionSnapshot {
    /// Whether a digitize request would be accepted
    pub fn can_digitize(&self) -> bool {
        self.image_name.is_some() && self.phase != SessionPhase::Processing
    }
}

/// Signature session use case
pub struct SignatureSession<D, C, S>
where
    D: Digitizer,
    C: Camera,
    S: DisplayStore,
{
    digitizer: D,
    camera: CameraManager<C>,
    store: S,
    acquisition: SourceAcquisition,
    state: Arc<Mutex<AcquisitionSession>>,
}

impl<D, C, S> SignatureSession<D, C, S>
where
    D: Digitizer,
    C: Camera,
    S: DisplayStore,
{
    /// Create an idle session
    pub fn new(digitizer: D, camera: CameraManager<C>, store: S, color: InkColor) -> Self {
        Self {
            digitizer,
            camera,
            store,
            acquisition: SourceAcquisition::new(),
            state: Arc::new(Mutex::new(AcquisitionSession::new(color))),
        }
    }

    pub fn camera(&self) -> &CameraManager<C> {
        &self.camera
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase()
    }

    /// Acquire an image from any source.
    ///
    /// # Returns
    /// `false` when the source carried nothing (state unchanged)
    pub async fn acquire(&self, source: ImageSource) -> Result<bool, SessionError> {
        let kind = source.kind();
        let image = match self.acquisition.normalize(source).await {
            Ok(Some(image)) => image,
            Ok(None) => {
                debug!(source = kind, "empty source ignored");
                return Ok(false);
            }
            Err(e) => {
                self.record_failure(e.to_string()).await;
                return Err(e.into());
            }
        };
        self.acquire_image(image, kind).await?;
        Ok(true)
    }

    async fn acquire_image(&self, image: ImageData, kind: &str) -> Result<(), SessionError> {
        let preview = match self.store.publish(image.bytes(), image.file_name()).await {
            Ok(handle) => handle,
            Err(e) => {
                self.record_failure(e.to_string()).await;
                return Err(e.into());
            }
        };
        info!(
            source = kind,
            file = image.file_name(),
            size = image.size_bytes(),
            "image acquired"
        );

        let released = {
            let mut state = self.state.lock().await;
            let released = state.acquire(AcquiredImage::new(image, preview));
            debug!(phase = %state.phase(), episode = state.episode(), "session updated");
            released
        };
        self.release_all(released).await;
        Ok(())
    }

    /// Begin a user-initiated digitization.
    ///
    /// The returned ticket must be passed to `run_submission`; splitting the
    /// two lets callers run the request on a spawned task.
    pub async fn begin_digitize(&self) -> Result<SubmissionTicket, SessionError> {
        let submission = {
            let mut state = self.state.lock().await;
            state.begin_submission(SubmitTrigger::User)?
        };
        debug!(episode = submission.ticket.episode, "submission started");
        self.release_all(submission.released).await;
        Ok(submission.ticket)
    }

    /// Begin and await a user-initiated digitization
    pub async fn digitize(&self) -> Result<SubmissionOutcome, SessionError> {
        let ticket = self.begin_digitize().await?;
        Ok(self.run_submission(ticket).await)
    }

    /// Change the ink color.
    ///
    /// # Returns
    /// A resubmission ticket when the color changed and an image is present
    pub async fn set_color(&self, color: InkColor) -> Option<SubmissionTicket> {
        let submission = {
            let mut state = self.state.lock().await;
            state.change_color(color)
        }?;
        debug!(
            episode = submission.ticket.episode,
            %color,
            "resubmitting after color change"
        );
        self.release_all(submission.released).await;
        Some(submission.ticket)
    }

    /// Send a ticket to the digitization service and apply the response
    /// if its episode is still current.
    pub async fn run_submission(&self, ticket: SubmissionTicket) -> SubmissionOutcome {
        let SubmissionTicket {
            episode,
            image,
            color,
        } = ticket;

        let response = self.digitizer.digitize(&image, color).await;
        let published = match response {
            Ok(bytes) => match self.store.publish(&bytes, EXPORT_FILE_NAME).await {
                Ok(handle) => Ok(DigitizationResult::new(
                    ImageData::png(bytes, EXPORT_FILE_NAME),
                    handle,
                )),
                Err(e) => Err(e.to_string()),
            },
            Err(failure) => Err(failure.message),
        };

        match published {
            Ok(result) => {
                let handle = result.handle().clone();
                let completion = self.state.lock().await.complete(episode, result);
                match completion {
                    Completion::Applied => {
                        info!(episode, %color, "digitization complete");
                        SubmissionOutcome::Completed(handle)
                    }
                    Completion::Stale(stale) => {
                        debug!(episode, "discarding stale result");
                        self.store.release(&stale).await;
                        SubmissionOutcome::Superseded
                    }
                }
            }
            Err(message) => {
                if self.state.lock().await.fail(episode, message.clone()) {
                    warn!(episode, error = %message, "digitization failed");
                    SubmissionOutcome::Failed(message)
                } else {
                    debug!(episode, "discarding stale failure");
                    SubmissionOutcome::Superseded
                }
            }
        }
    }

    /// Open the camera, with the given facing mode or the current one
    pub async fn open_camera(&self, facing: Option<FacingMode>) -> Result<(), SessionError> {
        let result = match facing {
            Some(facing) => self.camera.open(facing).await,
            None => self.camera.open_current().await,
        };
        self.camera_outcome(result).await
    }

    /// Flip the camera between user and environment facing
    pub async fn toggle_facing(&self) -> Result<FacingMode, SessionError> {
        let facing = match self.camera.toggle_facing().await {
            Ok(facing) => facing,
            Err(e) => {
                self.camera_outcome(Err(e)).await?;
                self.camera.facing()
            }
        };
        Ok(facing)
    }

    /// Capture a frame and acquire it as the new image
    pub async fn capture(&self) -> Result<(), SessionError> {
        match self.camera.capture().await {
            Ok(image) => {
                self.acquire(ImageSource::FromCapture(image)).await?;
                Ok(())
            }
            Err(e) => {
                self.camera_outcome(Err(e)).await?;
                Ok(())
            }
        }
    }

    /// Close the camera overlay. Returns `true` if it was open.
    pub fn close_camera(&self) -> bool {
        self.camera.close()
    }

    async fn camera_outcome(&self, result: Result<(), CameraError>) -> Result<(), SessionError> {
        match result {
            Ok(()) | Err(CameraError::Cancelled) => Ok(()),
            Err(e @ CameraError::NotOpen) => Err(e.into()),
            Err(e) => {
                self.record_failure(e.to_string()).await;
                Err(e.into())
            }
        }
    }

    /// Write the displayed result to disk.
    ///
    /// A directory destination gets `digitized_signature.png` inside it.
    pub async fn export(&self, destination: &Path) -> Result<PathBuf, SessionError> {
        let bytes = {
            let state = self.state.lock().await;
            state
                .result()
                .map(|result| result.data().bytes().to_vec())
                .ok_or(SessionError::NoResult)?
        };

        let path = if destination.is_dir() {
            destination.join(EXPORT_FILE_NAME)
        } else {
            destination.to_path_buf()
        };
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| SessionError::Export(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), size = bytes.len(), "result exported");
        Ok(path)
    }

    /// Current state for presentation
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        let image = state.image().map(AcquiredImage::data);
        SessionSnapshot {
            phase: state.phase(),
            color: state.color(),
            facing: self.camera.facing(),
            camera_open: self.camera.is_open(),
            image_name: image.map(|data| data.file_name().to_string()),
            image_size: image.map(ImageData::human_readable_size),
            preview: state
                .image()
                .map(|acquired| acquired.preview().location().to_path_buf()),
            result: state
                .result()
                .map(|result| result.handle().location().to_path_buf()),
            result_size: state
                .result()
                .map(|result| result.data().human_readable_size()),
            error: state.error().map(str::to_string),
            episode: state.episode(),
        }
    }

    /// Close the camera and return to idle, releasing every handle
    pub async fn reset(&self) {
        self.camera.close();
        let released = self.state.lock().await.reset();
        debug!(count = released.len(), "session reset");
        self.release_all(released).await;
    }

    async fn record_failure(&self, message: String) {
        warn!(error = %message, "acquisition failed");
        self.state.lock().await.fail_acquisition(message);
    }

    async fn release_all(&self, handles: Vec<DisplayHandle>) {
        for handle in handles {
            self.store.release(&handle).await;
        }
    }
}
