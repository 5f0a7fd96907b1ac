//! Camera device manager
//!
//! Owns at most one live video stream. Opening always stops the previous
//! stream first, and a stream that arrives after the camera was closed or
//! re-requested is stopped on arrival.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::domain::camera::{CameraSession, FacingMode};
use crate::domain::signature::{ImageData, CAPTURE_FILE_NAME};

use super::ports::{Camera, CameraError, VideoStream};

struct CameraState {
    session: CameraSession,
    stream: Option<Box<dyn VideoStream>>,
}

impl CameraState {
    fn stop_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!(facing = %stream.facing(), "stopping video stream");
            stream.stop();
        }
    }
}

/// Lifecycle of the live camera stream
pub struct CameraManager<C>
where
    C: Camera,
{
    camera: C,
    state: Mutex<CameraState>,
    mirror: bool,
}

impl<C> CameraManager<C>
where
    C: Camera,
{
    /// Create a manager with the camera closed.
    ///
    /// `mirror` flips captured frames horizontally, matching a mirrored
    /// live preview.
    pub fn new(camera: C, facing: FacingMode, mirror: bool) -> Self {
        Self {
            camera,
            state: Mutex::new(CameraState {
                session: CameraSession::new(facing),
                stream: None,
            }),
            mirror,
        }
    }

    // Held only for short synchronous sections, never across an await.
    fn lock(&self) -> MutexGuard<'_, CameraState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn facing(&self) -> FacingMode {
        self.lock().session.facing()
    }

    /// Whether the camera overlay is showing (a stream is live or pending)
    pub fn is_open(&self) -> bool {
        self.lock().session.is_open()
    }

    /// Whether a live stream is currently held
    pub fn has_active_stream(&self) -> bool {
        self.lock()
            .stream
            .as_ref()
            .is_some_and(|stream| stream.is_active())
    }

    pub fn mirror(&self) -> bool {
        self.mirror
    }

    /// Open a stream for the given facing mode.
    ///
    /// Returns `CameraError::Cancelled` when the camera was closed or
    /// reopened while this request was pending, whether the request itself
    /// succeeded or failed.
    pub async fn open(&self, facing: FacingMode) -> Result<(), CameraError> {
        let generation = {
            let mut state = self.lock();
            state.stop_stream();
            state.session.request_open(facing)
        };
        debug!(%facing, generation, "requesting camera stream");

        match self.camera.open(facing).await {
            Ok(mut stream) => {
                let mut state = self.lock();
                if !state.session.is_current(generation) {
                    debug!(generation, "discarding stream for a superseded request");
                    stream.stop();
                    return Err(CameraError::Cancelled);
                }
                info!(%facing, "camera stream started");
                state.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                let mut state = self.lock();
                if !state.session.is_current(generation) {
                    debug!(generation, error = %e, "ignoring failure of a superseded request");
                    return Err(CameraError::Cancelled);
                }
                state.session.close();
                warn!(%facing, error = %e, "camera open failed");
                Err(e)
            }
        }
    }

    /// Open with the currently selected facing mode
    pub async fn open_current(&self) -> Result<(), CameraError> {
        let facing = self.facing();
        self.open(facing).await
    }

    /// Switch facing mode. If the camera is open the old stream is stopped
    /// before the new one is requested.
    pub async fn toggle_facing(&self) -> Result<FacingMode, CameraError> {
        let toggle = {
            let mut state = self.lock();
            let toggle = state.session.toggle_facing();
            if toggle.reopen {
                state.stop_stream();
            }
            toggle
        };
        if toggle.reopen {
            self.open(toggle.facing).await?;
        }
        Ok(toggle.facing)
    }

    /// Grab the current frame as a PNG and close the camera.
    ///
    /// The frame is mirrored first when the manager was built with
    /// `mirror`. On a snapshot failure the stream stays open.
    pub async fn capture(&self) -> Result<ImageData, CameraError> {
        let frame = {
            let mut state = self.lock();
            let frame = state
                .stream
                .as_ref()
                .ok_or(CameraError::NotOpen)?
                .snapshot()?;
            state.stop_stream();
            state.session.close();
            frame
        };

        let mirror = self.mirror;
        let bytes = tokio::task::spawn_blocking(move || {
            let frame = if mirror { frame.mirrored() } else { frame };
            frame.encode_png()
        })
        .await
        .map_err(|e| CameraError::CaptureFailed(e.to_string()))?
        .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;

        info!(size = bytes.len(), "captured camera frame");
        Ok(ImageData::png(bytes, CAPTURE_FILE_NAME))
    }

    /// Stop the stream and hide the overlay. Safe to call repeatedly.
    ///
    /// # Returns
    /// `true` if the camera was open
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        state.stop_stream();
        state.session.close()
    }
}

impl<C> Drop for CameraManager<C>
where
    C: Camera,
{
    fn drop(&mut self) {
        self.lock().stop_stream();
    }
}
