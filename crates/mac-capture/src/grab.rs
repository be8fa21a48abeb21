//! Two-tier window capture.
//!
//! macOS 14 and later use ScreenCaptureKit: the window is looked up by id in
//! the shareable-content registry and streamed for a single frame through a
//! desktop-independent window filter, so only that window's pixels are
//! imaged. Older systems fall back to the CGWindowList bitmap API, which
//! also images the window directly.

use std::time::Duration;

use tracing::{debug, warn};

use mac_winctl::{WindowId, list_windows};

use crate::{
    frame::Capture,
    scale::{ScreenFrame, scale_for_rect, screens_snapshot},
};

/// How long to wait for the stream to deliver its first frame.
const FRAME_WAIT: Duration = Duration::from_secs(2);

/// Capture one frame of window `id`.
///
/// Returns `None` when the window has vanished or both capture tiers fail;
/// capture trouble must never abort the resize that triggered it. The
/// screen snapshot is taken before handing off to the blocking pool so the
/// main-thread screen APIs are still reachable when the caller runs there.
pub async fn capture_window(id: WindowId) -> Option<Capture> {
    let screens = screens_snapshot();
    match tokio::task::spawn_blocking(move || capture_blocking(id, &screens)).await {
        Ok(cap) => cap,
        Err(err) => {
            warn!("capture_window: blocking capture task failed: {err}");
            None
        }
    }
}

fn capture_blocking(id: WindowId, screens: &[ScreenFrame]) -> Option<Capture> {
    let Some(info) = list_windows().into_iter().find(|w| w.id == id) else {
        debug!("capture_blocking: window {id} no longer listed");
        return None;
    };
    let scale = scale_for_rect(screens, &info.bounds);
    if modern_capture_available() {
        if let Some(cap) = modern::capture(id, &info.bounds, scale) {
            return Some(cap);
        }
        debug!("capture_blocking: stream capture failed; trying bitmap fallback");
    }
    legacy::capture(id, scale)
}

/// ScreenCaptureKit delivers frames from macOS 12.3, but the per-window
/// behavior this crate depends on is only reliable from 14.
fn modern_capture_available() -> bool {
    let v = objc2_foundation::NSProcessInfo::processInfo().operatingSystemVersion();
    v.majorVersion >= 14
}

mod modern {
    use image::RgbaImage;
    use screencapturekit::prelude::{
        PixelFormat, SCContentFilter, SCShareableContent, SCStream, SCStreamConfiguration,
        SCStreamOutputType,
    };
    use tracing::{debug, warn};

    use super::FRAME_WAIT;
    use crate::frame::{Capture, bgra_to_rgba, pixel_dimensions};
    use mac_winctl::{Rect, WindowId};

    /// Stream one frame of window `id` through a desktop-independent window
    /// filter. The filter isolates the window: occluding windows, menus and
    /// the desktop background never reach the delivered pixels, and the
    /// window is imaged whole even when partially off screen.
    pub(super) fn capture(id: WindowId, bounds: &Rect, scale: f64) -> Option<Capture> {
        let content = match SCShareableContent::get() {
            Ok(c) => c,
            Err(err) => {
                warn!("capture: shareable content unavailable: {err}");
                return None;
            }
        };
        let windows = content.windows();
        let Some(window) = windows.iter().find(|w| w.window_id() == id) else {
            debug!("capture: window {id} not in shareable content");
            return None;
        };

        let filter = SCContentFilter::create()
            .with_desktop_independent_window(window)
            .build();
        let (px_w, px_h) = pixel_dimensions(bounds, scale);
        let config = SCStreamConfiguration::new()
            .with_width(px_w)
            .with_height(px_h)
            .with_pixel_format(PixelFormat::BGRA)
            .with_queue_depth(2)
            .with_fps(10)
            .with_shows_cursor(false)
            .with_captures_audio(false);

        let (tx, rx) = crossbeam_channel::bounded::<(u32, u32, Vec<u8>)>(1);
        let mut stream = SCStream::new(&filter, &config);
        stream.add_output_handler(
            move |sample: screencapturekit::cm::CMSampleBuffer, output_type| {
                if output_type != SCStreamOutputType::Screen {
                    return;
                }
                if sample
                    .frame_status()
                    .map(|status| !status.has_content())
                    .unwrap_or(false)
                {
                    return;
                }
                let Some(pixel_buffer) = sample.image_buffer() else {
                    return;
                };
                let Ok(guard) = pixel_buffer.lock_read_only() else {
                    return;
                };
                let (width, height) = (guard.width(), guard.height());
                let Some(rgba) =
                    bgra_to_rgba(guard.as_slice(), width, height, guard.bytes_per_row())
                else {
                    return;
                };
                // Only the first frame matters; later sends hit a full
                // bounded(1) channel and are dropped.
                let _ = tx.try_send((width as u32, height as u32, rgba));
            },
            SCStreamOutputType::Screen,
        );

        if let Err(err) = stream.start_capture() {
            warn!("capture: start_capture failed: {err}");
            return None;
        }
        let frame = rx.recv_timeout(FRAME_WAIT);
        if let Err(err) = stream.stop_capture() {
            debug!("capture: stop_capture failed: {err}");
        }
        let (got_w, got_h, rgba) = match frame {
            Ok(f) => f,
            Err(_) => {
                warn!("capture: no frame within {FRAME_WAIT:?}");
                return None;
            }
        };

        let image = RgbaImage::from_raw(got_w, got_h, rgba)?;
        Some(Capture {
            image,
            logical_width: bounds.w.round() as u32,
            logical_height: bounds.h.round() as u32,
            scale,
        })
    }
}

mod legacy {
    use core_graphics::{
        display::CGDisplay,
        geometry::{CGPoint, CGRect, CGSize},
        window::{
            kCGWindowImageBestResolution, kCGWindowImageBoundsIgnoreFraming,
            kCGWindowListOptionIncludingWindow,
        },
    };
    use image::RgbaImage;
    use tracing::warn;

    use crate::frame::{Capture, bgra_to_rgba};
    use mac_winctl::WindowId;

    /// Image the window directly through the listing service's bitmap API.
    /// Pixels arrive BGRA at the window's best (Retina) resolution.
    pub(super) fn capture(id: WindowId, scale: f64) -> Option<Capture> {
        let image = CGDisplay::screenshot(
            CGRect::new(&CGPoint::new(0.0, 0.0), &CGSize::new(0.0, 0.0)),
            kCGWindowListOptionIncludingWindow,
            id,
            kCGWindowImageBestResolution | kCGWindowImageBoundsIgnoreFraming,
        )?;
        let (width, height) = (image.width(), image.height());
        let data = image.data();
        let Some(rgba) = bgra_to_rgba(data.bytes(), width, height, image.bytes_per_row()) else {
            warn!("capture: bitmap geometry mismatch for window {id}");
            return None;
        };
        let img = RgbaImage::from_raw(width as u32, height as u32, rgba)?;
        Some(Capture::from_pixels(img, scale))
    }
}
