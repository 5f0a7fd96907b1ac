//! Still frame value object

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{imageops, ExtendedColorType, ImageEncoder, RgbImage};
use thiserror::Error;

/// Errors building or encoding a frame
#[derive(Debug, Clone, Error)]
pub enum FrameError {
    #[error("Frame buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to encode frame: {0}")]
    EncodeFailed(String),
}

/// A single video frame at the sensor's native resolution, packed RGB8,
/// rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    image: RgbImage,
}

impl RawFrame {
    /// Wrap a packed RGB8 buffer
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 3;
        let actual = rgb.len();
        RgbImage::from_raw(width, height, rgb)
            .map(|image| Self { image })
            .ok_or(FrameError::SizeMismatch {
                width,
                height,
                expected,
                actual,
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGB value at (x, y), if in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Flip horizontally so the frame matches a mirrored live preview
    pub fn mirrored(&self) -> Self {
        Self {
            image: imageops::flip_horizontal(&self.image),
        }
    }

    /// Encode losslessly as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, FrameError> {
        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out)
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| FrameError::EncodeFailed(e.to_string()))?;
        Ok(out.into_inner())
    }
}
