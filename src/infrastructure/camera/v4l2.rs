//! V4L2 camera adapter
//!
//! Each stream runs a capture thread that owns the device and keeps the
//! latest decoded frame. The v4l mmap stream borrows the device, so both
//! live on that thread.
//!
//! Stopping a stream only signals its thread. The thread is joined on the
//! blocking pool before the next open, so the device is free again by then
//! and no async caller waits on a stalled `VIDIOC_DQBUF`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

use crate::application::ports::{Camera, CameraError, VideoStream};
use crate::domain::camera::{FacingMode, RawFrame};

use super::yuyv::yuyv_to_frame;
use super::CameraSettings;

/// Number of mmap buffers requested from the driver
const BUFFER_COUNT: u32 = 4;

/// Longest wait for a single frame before the stream counts as stalled
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest wait for an open request, from joining old threads to the first frame
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

const YUYV: &[u8; 4] = b"YUYV";

type LatestFrame = Arc<Mutex<Option<RawFrame>>>;

/// Capture threads that were told to stop but not joined yet
type Retired = Arc<Mutex<Vec<JoinHandle<()>>>>;

/// Camera backed by `/dev/videoN` devices
pub struct V4l2Camera {
    settings: CameraSettings,
    retired: Retired,
}

impl V4l2Camera {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            retired: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Join every stopped capture thread on the blocking pool
    async fn join_retired(&self) -> Result<(), CameraError> {
        let threads = {
            let mut retired = self.retired.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *retired)
        };
        if threads.is_empty() {
            return Ok(());
        }
        debug!(count = threads.len(), "joining stopped capture threads");
        tokio::task::spawn_blocking(move || {
            for thread in threads {
                if thread.join().is_err() {
                    warn!("v4l2 capture thread panicked");
                }
            }
        })
        .await
        .map_err(|e| unavailable(e.to_string()))
    }

    async fn open_stream(&self, facing: FacingMode) -> Result<V4l2Stream, CameraError> {
        self.join_retired().await?;

        let index = self.settings.device_for(facing);
        let (width, height) = (self.settings.width, self.settings.height);

        let running = Arc::new(AtomicBool::new(true));
        let latest: LatestFrame = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = oneshot::channel();

        let thread = {
            let running = Arc::clone(&running);
            let latest = Arc::clone(&latest);
            std::thread::Builder::new()
                .name(format!("v4l2-capture-{}", index))
                .spawn(move || {
                    Self::capture_loop(index, width, height, running, latest, ready_tx)
                })
                .map_err(|e| unavailable(e.to_string()))?
        };

        let mut stream = V4l2Stream {
            facing,
            running,
            latest,
            thread: Some(thread),
            retired: Arc::clone(&self.retired),
        };

        match ready_rx.await {
            Ok(Ok(())) => Ok(stream),
            Ok(Err(e)) => {
                stream.stop();
                Err(e)
            }
            Err(_) => {
                stream.stop();
                Err(unavailable("capture thread exited".to_string()))
            }
        }
    }

    /// Open the device and negotiate a YUYV format at the requested size
    fn open_device(index: u32, width: u32, height: u32) -> Result<(Device, Format), CameraError> {
        let device = Device::new(index as usize)
            .map_err(|e| unavailable(format!("/dev/video{}: {}", index, e)))?;

        let mut format = device.format().map_err(|e| unavailable(e.to_string()))?;
        format.width = width;
        format.height = height;
        format.fourcc = FourCC::new(YUYV);

        let format = device
            .set_format(&format)
            .map_err(|e| unavailable(e.to_string()))?;
        if format.fourcc != FourCC::new(YUYV) {
            return Err(unavailable(format!(
                "unsupported pixel format {}",
                format.fourcc
            )));
        }

        Ok((device, format))
    }

    fn capture_loop(
        index: u32,
        width: u32,
        height: u32,
        running: Arc<AtomicBool>,
        latest: LatestFrame,
        ready: oneshot::Sender<Result<(), CameraError>>,
    ) {
        let (device, format) = match Self::open_device(index, width, height) {
            Ok(opened) => opened,
            Err(e) => {
                running.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(e));
                return;
            }
        };

        let mut stream = match Stream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
            Ok(mut stream) => {
                stream.set_timeout(FRAME_TIMEOUT);
                stream
            }
            Err(e) => {
                running.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(unavailable(e.to_string())));
                return;
            }
        };
        debug!(
            index,
            width = format.width,
            height = format.height,
            "v4l2 stream started"
        );

        let mut ready = Some(ready);
        while running.load(Ordering::SeqCst) {
            let buf = match stream.next() {
                Ok((buf, _meta)) => buf,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    warn!(index, timeout = ?FRAME_TIMEOUT, "v4l2 device stopped delivering frames");
                    if let Some(ready) = ready.take() {
                        let _ = ready.send(Err(unavailable(format!(
                            "no frame within {:?}",
                            FRAME_TIMEOUT
                        ))));
                    }
                    break;
                }
                Err(e) => {
                    warn!(index, error = %e, "v4l2 capture failed");
                    if let Some(ready) = ready.take() {
                        let _ = ready.send(Err(unavailable(e.to_string())));
                    }
                    break;
                }
            };

            match yuyv_to_frame(buf, format.width, format.height, format.stride) {
                Ok(frame) => {
                    *latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(frame);
                    // first decoded frame: the stream is usable
                    if let Some(ready) = ready.take() {
                        let _ = ready.send(Ok(()));
                    }
                }
                Err(e) => debug!(error = %e, "dropping undecodable frame"),
            }
        }

        running.store(false, Ordering::SeqCst);
        debug!(index, "v4l2 stream stopped");
    }
}

#[async_trait]
impl Camera for V4l2Camera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CameraError> {
        match tokio::time::timeout(OPEN_TIMEOUT, self.open_stream(facing)).await {
            Ok(Ok(stream)) => Ok(Box::new(stream)),
            Ok(Err(e)) => Err(e),
            // Dropping the pending stream retires its thread
            Err(_) => Err(unavailable(format!(
                "camera did not start within {:?}",
                OPEN_TIMEOUT
            ))),
        }
    }
}

/// Live stream handle. `stop` signals the capture thread and hands it to
/// the camera for joining.
pub struct V4l2Stream {
    facing: FacingMode,
    running: Arc<AtomicBool>,
    latest: LatestFrame,
    thread: Option<JoinHandle<()>>,
    retired: Retired,
}

impl VideoStream for V4l2Stream {
    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn snapshot(&self) -> Result<RawFrame, CameraError> {
        if !self.is_active() {
            return Err(CameraError::NotOpen);
        }
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| CameraError::CaptureFailed("no frame available yet".to_string()))
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            self.retired
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(thread);
        }
    }

    fn is_active(&self) -> bool {
        self.running.load(Ordering::SeqCst) && self.thread.is_some()
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn unavailable(reason: String) -> CameraError {
    CameraError::DeviceUnavailable(reason)
}
