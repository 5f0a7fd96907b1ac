//! Signature image domain module

mod image_data;
mod ink_color;

pub use image_data::{
    guess_mime_type, is_image_path, AcquiredImage, DigitizationResult, DisplayHandle, ImageData,
    CAPTURE_FILE_NAME, EXPORT_FILE_NAME, FALLBACK_MIME_TYPE,
};
pub use ink_color::{InkColor, ALL_INK_COLORS};
