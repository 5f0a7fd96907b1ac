//! Source acquisition: normalises picked, dropped and captured images into
//! a single payload type.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::domain::signature::ImageData;

/// Errors reading an image source
#[derive(Debug, Clone, Error)]
pub enum AcquisitionError {
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },
}

/// A file carried by a drag-and-drop payload
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk as a drop payload entry
    pub async fn read(path: &Path) -> Result<Self, AcquisitionError> {
        let bytes = fs::read(path).await.map_err(|e| read_failed(path, e))?;
        Ok(Self::new(file_name_of(path), bytes))
    }
}

/// Where an image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// File chosen through the picker
    FromPicker(PathBuf),
    /// Drag-and-drop payload; only the first file is used
    FromDrop(Vec<DroppedFile>),
    /// Frame captured by the camera manager
    FromCapture(ImageData),
}

impl ImageSource {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FromPicker(_) => "picker",
            Self::FromDrop(_) => "drop",
            Self::FromCapture(_) => "capture",
        }
    }
}

/// Source acquisition controller.
/// Does not validate content: whatever bytes arrive are passed on, and a
/// malformed image only surfaces when the service rejects it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceAcquisition;

impl SourceAcquisition {
    pub fn new() -> Self {
        Self
    }

    /// Turn a source into an image payload.
    ///
    /// # Returns
    /// `None` when the source carries no file (an empty drop)
    pub async fn normalize(&self, source: ImageSource) -> Result<Option<ImageData>, AcquisitionError> {
        match source {
            ImageSource::FromPicker(path) => {
                let bytes = fs::read(&path).await.map_err(|e| read_failed(&path, e))?;
                Ok(Some(ImageData::from_named_bytes(bytes, file_name_of(&path))))
            }
            ImageSource::FromDrop(files) => Ok(files
                .into_iter()
                .next()
                .map(|file| ImageData::from_named_bytes(file.bytes, file.name))),
            ImageSource::FromCapture(image) => Ok(Some(image)),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn read_failed(path: &Path, e: std::io::Error) -> AcquisitionError {
    AcquisitionError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
