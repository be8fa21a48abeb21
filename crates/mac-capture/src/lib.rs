//! Window screenshot capture, scale correction, and PNG export.
//!
//! Capture is two-tier: ScreenCaptureKit on macOS 14 and later, with a
//! CGWindowList bitmap fallback on older systems. Both tiers deliver a
//! [`Capture`] whose pixel data is raw RGBA and whose logical (point)
//! dimensions account for the Retina scale of the display the window sits
//! on, so exported files report the size the user actually sees.

use std::time::Duration;

mod error;
mod frame;
mod scale;

mod export;

#[cfg(target_os = "macos")]
mod clipboard;
#[cfg(target_os = "macos")]
mod grab;

pub use error::{Error, Result};
pub use export::{export_png, sanitize_component, screenshot_filename};
pub use frame::Capture;
pub use scale::{ScreenFrame, scale_for_rect};

#[cfg(target_os = "macos")]
pub use clipboard::copy_to_clipboard;
#[cfg(target_os = "macos")]
pub use grab::capture_window;
#[cfg(target_os = "macos")]
pub use scale::screens_snapshot;

/// Pause between a successful resize and the screenshot, giving the target
/// application time to redraw at the new size. There is no redraw-complete
/// signal to wait on, so this is a fixed delay.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);
