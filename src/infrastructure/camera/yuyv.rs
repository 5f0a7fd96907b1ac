//! YUYV (YUV 4:2:2) to RGB conversion

use crate::domain::camera::{FrameError, RawFrame};

/// Convert a packed YUYV buffer to an RGB frame.
///
/// `stride` is the number of bytes per row; 0 means tightly packed.
/// Each 4-byte group `[Y0 U Y1 V]` covers two pixels sharing U and V.
pub fn yuyv_to_frame(
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
) -> Result<RawFrame, FrameError> {
    let stride = if stride == 0 { width * 2 } else { stride } as usize;
    let row_bytes = width as usize * 2;
    let needed = stride * (height as usize).saturating_sub(1) + row_bytes;
    if height > 0 && data.len() < needed {
        return Err(FrameError::SizeMismatch {
            width,
            height,
            expected: needed,
            actual: data.len(),
        });
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for row in 0..height as usize {
        let line = &data[row * stride..row * stride + row_bytes];
        for (i, chunk) in line.chunks(4).enumerate() {
            let [y0, u, y1, v] = match *chunk {
                [y0, u, y1, v] => [y0, u, y1, v],
                // odd width: the last group is truncated
                [y0, u] => [y0, u, y0, 128],
                _ => break,
            };
            rgb.extend_from_slice(&yuv_to_rgb(y0, u, v));
            if (i * 2 + 1) < width as usize {
                rgb.extend_from_slice(&yuv_to_rgb(y1, u, v));
            }
        }
    }

    RawFrame::from_rgb(width, height, rgb)
}

/// ITU-R BT.601 conversion, clamped to 0..=255
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = f32::from(y);
    let u = f32::from(u) - 128.0;
    let v = f32::from(v) - 128.0;

    let r = 1.402f32.mul_add(v, y);
    let g = 0.714_14f32.mul_add(-v, 0.344_14f32.mul_add(-u, y));
    let b = 1.772f32.mul_add(u, y);

    [clamp(r), clamp(g), clamp(b)]
}

fn clamp(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
