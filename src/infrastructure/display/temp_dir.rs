//! Display handles backed by files in a per-session temporary directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, warn};

use crate::application::ports::{DisplayError, DisplayStore};
use crate::domain::signature::DisplayHandle;

/// Each published image becomes a file a viewer can open. Released handles
/// delete their file; the directory goes away with the store.
pub struct TempDirDisplayStore {
    dir: TempDir,
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, PathBuf>>,
}

impl TempDirDisplayStore {
    /// Create the backing directory under the system temp dir
    pub fn new() -> Result<Self, DisplayError> {
        let dir = tempfile::Builder::new()
            .prefix("signato-")
            .tempdir()
            .map_err(|e| DisplayError::PublishFailed(e.to_string()))?;
        debug!(dir = %dir.path().display(), "display store created");

        Ok(Self {
            dir,
            next_id: AtomicU64::new(0),
            live: Mutex::new(HashMap::new()),
        })
    }

    /// Directory holding the published files
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn file_path(&self, id: u64, file_name: &str) -> PathBuf {
        let safe: String = file_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.path().join(format!("{:04}-{}", id, safe))
    }
}

#[async_trait]
impl DisplayStore for TempDirDisplayStore {
    async fn publish(&self, bytes: &[u8], file_name: &str) -> Result<DisplayHandle, DisplayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.file_path(id, file_name);

        fs::write(&path, bytes)
            .await
            .map_err(|e| DisplayError::PublishFailed(e.to_string()))?;

        self.live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, path.clone());
        debug!(id, path = %path.display(), "published display handle");

        Ok(DisplayHandle::new(id, path))
    }

    async fn release(&self, handle: &DisplayHandle) {
        let path = self
            .live
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle.id());

        if let Some(path) = path {
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "failed to remove display file");
            }
            debug!(id = handle.id(), "released display handle");
        }
    }

    fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
