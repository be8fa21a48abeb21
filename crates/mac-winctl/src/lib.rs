//! mac-winctl: macOS window discovery and resizing for sizefit.
//!
//! Two OS subsystems are involved and they share no window identifier:
//! CGWindowList enumerates on-screen windows read-only (keyed by
//! `kCGWindowNumber`), while AXUIElement grants read/write access to another
//! process's windows but exposes no CG window number on most apps. Bridging
//! the two is done per resize call by matching the owning pid plus the
//! window title, with a first-window fallback for single-window apps.
//!
//! All mutating operations require a functional Accessibility permission and
//! re-check it on entry; see the `permissions` crate.

#[cfg(target_os = "macos")]
mod ax;
#[cfg(target_os = "macos")]
mod cfutil;
mod error;
mod geom;
mod matching;
#[cfg(target_os = "macos")]
mod resize;
mod window;

#[cfg(target_os = "macos")]
pub use ax::AxOutcome;
pub use error::{Error, Result};
pub use geom::Rect;
pub use matching::{Candidate, select_target};
#[cfg(target_os = "macos")]
pub use resize::resize_window;
#[cfg(target_os = "macos")]
pub use window::list_windows;
pub use window::{WindowId, WindowInfo};
