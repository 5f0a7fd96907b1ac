//! Mock adapters shared by the application unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::ports::{
    Camera, CameraError, Digitizer, DisplayError, DisplayStore, ProcessingFailure, VideoStream,
};
use crate::domain::camera::{FacingMode, RawFrame};
use crate::domain::signature::{DisplayHandle, ImageData, InkColor};

pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

/// 2x1 frame: red on the left, blue on the right (sensor orientation)
pub fn red_blue_frame() -> RawFrame {
    RawFrame::from_rgb(2, 1, [RED, BLUE].concat()).unwrap()
}

/// Counts live streams and remembers the highest count ever reached
#[derive(Default)]
pub struct StreamCounter {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl StreamCounter {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn started(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn stopped(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MockStream {
    facing: FacingMode,
    frame: RawFrame,
    counter: Arc<StreamCounter>,
    running: bool,
}

impl VideoStream for MockStream {
    fn facing(&self) -> FacingMode {
        self.facing
    }

    fn snapshot(&self) -> Result<RawFrame, CameraError> {
        if !self.running {
            return Err(CameraError::CaptureFailed("stream stopped".to_string()));
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.counter.stopped();
        }
    }

    fn is_active(&self) -> bool {
        self.running
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Camera returning a fixed frame. Can be made to deny access or to hold
/// open requests until released.
pub struct MockCamera {
    pub counter: Arc<StreamCounter>,
    pub requests: Arc<Mutex<Vec<FacingMode>>>,
    deny: Option<String>,
    fail_first: Option<String>,
    gate: Option<Arc<Notify>>,
    gate_first_only: bool,
    frame: RawFrame,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(StreamCounter::default()),
            requests: Arc::new(Mutex::new(Vec::new())),
            deny: None,
            fail_first: None,
            gate: None,
            gate_first_only: false,
            frame: red_blue_frame(),
        }
    }

    pub fn denying(reason: &str) -> Self {
        Self {
            deny: Some(reason.to_string()),
            ..Self::new()
        }
    }

    /// Open requests wait for a permit on the returned gate
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                gate: Some(Arc::clone(&gate)),
                ..Self::new()
            },
            gate,
        )
    }

    /// The first open request waits on the returned gate and then fails
    /// with `reason`; later requests succeed at once
    pub fn busy_first(reason: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (
            Self {
                fail_first: Some(reason.to_string()),
                gate: Some(Arc::clone(&gate)),
                gate_first_only: true,
                ..Self::new()
            },
            gate,
        )
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Camera for MockCamera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CameraError> {
        let first = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(facing);
            requests.len() == 1
        };
        if let Some(gate) = &self.gate {
            if first || !self.gate_first_only {
                gate.notified().await;
            }
        }
        if let Some(reason) = &self.deny {
            return Err(CameraError::DeviceUnavailable(reason.clone()));
        }
        if let (true, Some(reason)) = (first, &self.fail_first) {
            return Err(CameraError::DeviceUnavailable(reason.clone()));
        }
        self.counter.started();
        Ok(Box::new(MockStream {
            facing,
            frame: self.frame.clone(),
            counter: Arc::clone(&self.counter),
            running: true,
        }))
    }
}

/// Scripted digitizer response
#[derive(Clone)]
pub enum Reply {
    Ok(Vec<u8>),
    Fail(String),
}

/// Digitizer answering per color; a color can be held until released
pub struct MockDigitizer {
    replies: HashMap<InkColor, Reply>,
    gates: HashMap<InkColor, Arc<Notify>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockDigitizer {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            gates: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn reply(mut self, color: InkColor, reply: Reply) -> Self {
        self.replies.insert(color, reply);
        self
    }

    pub fn gate(mut self, color: InkColor) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(color, Arc::clone(&gate));
        (self, gate)
    }
}

#[async_trait]
impl Digitizer for MockDigitizer {
    async fn digitize(
        &self,
        _image: &ImageData,
        color: InkColor,
    ) -> Result<Vec<u8>, ProcessingFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gates.get(&color) {
            gate.notified().await;
        }
        match self.replies.get(&color) {
            Some(Reply::Ok(bytes)) => Ok(bytes.clone()),
            Some(Reply::Fail(message)) => Err(ProcessingFailure::service(422, message.clone())),
            None => Ok(format!("processed-{}", color).into_bytes()),
        }
    }
}

/// In-memory display store that tracks live handles
#[derive(Default)]
pub struct MemoryDisplayStore {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, Vec<u8>>>,
    pub fail_publish: AtomicBool,
}

impl MemoryDisplayStore {
    pub fn bytes_of(&self, handle: &DisplayHandle) -> Option<Vec<u8>> {
        self.live.lock().unwrap().get(&handle.id()).cloned()
    }
}

#[async_trait]
impl DisplayStore for MemoryDisplayStore {
    async fn publish(&self, bytes: &[u8], file_name: &str) -> Result<DisplayHandle, DisplayError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(DisplayError::PublishFailed("disk full".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.live.lock().unwrap().insert(id, bytes.to_vec());
        Ok(DisplayHandle::new(id, format!("mem://{}/{}", id, file_name)))
    }

    async fn release(&self, handle: &DisplayHandle) {
        self.live.lock().unwrap().remove(&handle.id());
    }

    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}
