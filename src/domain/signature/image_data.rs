//! Image payload value objects

use std::path::{Path, PathBuf};

use image::ImageFormat;

/// MIME type used when the payload's format cannot be guessed
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// File name given to frames captured from the camera
pub const CAPTURE_FILE_NAME: &str = "camera_capture.png";

/// File name used when exporting a digitized result
pub const EXPORT_FILE_NAME: &str = "digitized_signature.png";

/// Value object representing an opaque binary image payload.
/// The bytes are never inspected; the MIME type is only a hint for the
/// multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
    file_name: String,
    mime_type: &'static str,
}

impl ImageData {
    /// Create ImageData with an explicit MIME type
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: &'static str) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type,
        }
    }

    /// Create ImageData guessing the MIME type from the file name's extension
    pub fn from_named_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mime_type = guess_mime_type(Path::new(&file_name));
        Self {
            bytes,
            file_name,
            mime_type,
        }
    }

    /// PNG payload
    pub fn png(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self::new(bytes, file_name, ImageFormat::Png.to_mime_type())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Guess an image MIME type from a path's extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// Whether the path's extension names a known image format
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Handle to a renderable copy of an image, created by a display store.
/// Handles must be released through the store that issued them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle {
    id: u64,
    location: PathBuf,
}

impl DisplayHandle {
    pub fn new(id: u64, location: impl Into<PathBuf>) -> Self {
        Self {
            id,
            location: location.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Where the renderable copy lives
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// The image currently queued for (or already submitted to) digitization
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    data: ImageData,
    preview: DisplayHandle,
}

impl AcquiredImage {
    pub fn new(data: ImageData, preview: DisplayHandle) -> Self {
        Self { data, preview }
    }

    pub fn data(&self) -> &ImageData {
        &self.data
    }

    pub fn preview(&self) -> &DisplayHandle {
        &self.preview
    }

    pub(crate) fn into_preview(self) -> DisplayHandle {
        self.preview
    }
}

/// Processed image returned by the digitization service
#[derive(Debug, Clone)]
pub struct DigitizationResult {
    data: ImageData,
    handle: DisplayHandle,
}

impl DigitizationResult {
    pub fn new(data: ImageData, handle: DisplayHandle) -> Self {
        Self { data, handle }
    }

    pub fn data(&self) -> &ImageData {
        &self.data
    }

    /// Display/export handle
    pub fn handle(&self) -> &DisplayHandle {
        &self.handle
    }

    pub(crate) fn into_handle(self) -> DisplayHandle {
        self.handle
    }
}
