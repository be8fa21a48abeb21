//! Captured frame representation and pixel-format conversion.

use image::RgbaImage;
use mac_winctl::Rect;

/// One captured window frame.
///
/// `image` holds the full-resolution pixels; `logical_width`/`logical_height`
/// are the point dimensions after dividing by `scale`, i.e. the size the
/// window occupies on screen and the size a resize preset refers to.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Raw RGBA pixels at native (backing-store) resolution.
    pub image: RgbaImage,
    /// Width in points.
    pub logical_width: u32,
    /// Height in points.
    pub logical_height: u32,
    /// Backing scale of the display the window was captured from.
    pub scale: f64,
}

impl Capture {
    /// Build a capture from native-resolution pixels, deriving the logical
    /// dimensions from `scale`. Non-positive scales are treated as 1.0.
    pub fn from_pixels(image: RgbaImage, scale: f64) -> Self {
        let s = if scale > 0.0 { scale } else { 1.0 };
        let logical_width = (f64::from(image.width()) / s).round() as u32;
        let logical_height = (f64::from(image.height()) / s).round() as u32;
        Self {
            image,
            logical_width,
            logical_height,
            scale: s,
        }
    }
}

/// Output dimensions in pixels for capturing a window rect at a display
/// scale. Non-positive scales are treated as 1.0.
pub(crate) fn pixel_dimensions(bounds: &Rect, scale: f64) -> (u32, u32) {
    let s = if scale > 0.0 { scale } else { 1.0 };
    (
        (bounds.w * s).round() as u32,
        (bounds.h * s).round() as u32,
    )
}

/// Convert tightly-or-loosely packed BGRA rows into a packed RGBA buffer.
///
/// `bytes_per_row` may exceed `width * 4` (row padding is common in
/// IOSurface-backed buffers); padding bytes are skipped. Returns `None` when
/// the source buffer is too small for the claimed geometry.
pub(crate) fn bgra_to_rgba(
    raw: &[u8],
    width: usize,
    height: usize,
    bytes_per_row: usize,
) -> Option<Vec<u8>> {
    if width == 0 || height == 0 || bytes_per_row < width.saturating_mul(4) {
        return None;
    }
    if raw.len() < bytes_per_row.saturating_mul(height) {
        return None;
    }
    let mut rgba = vec![0_u8; width * height * 4];
    for y in 0..height {
        let src_row = &raw[y * bytes_per_row..y * bytes_per_row + width * 4];
        let dst_row = &mut rgba[y * width * 4..(y + 1) * width * 4];
        for x in 0..width {
            let i = x * 4;
            dst_row[i] = src_row[i + 2];
            dst_row[i + 1] = src_row[i + 1];
            dst_row[i + 2] = src_row[i];
            dst_row[i + 3] = src_row[i + 3];
        }
    }
    Some(rgba)
}
