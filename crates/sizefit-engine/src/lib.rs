//! sizefit-engine: the resize-and-screenshot workflow.
//!
//! The engine sequences the platform crates: resize the target window to a
//! preset, wait for the application to redraw, capture the window, then
//! export the capture to disk and/or the pasteboard according to the user's
//! settings. Only the resize can fail the workflow; capture and export
//! trouble is reported in the [`Outcome`] and logged, never escalated.

mod engine;
mod error;
mod ops;

pub use engine::{Engine, Outcome, ShotOptions, default_save_dir};
pub use error::{Error, Result};
#[cfg(target_os = "macos")]
pub use ops::RealWinOps;
pub use ops::{MockWinOps, WinOps};
