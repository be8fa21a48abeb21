//! Engine error type.

use thiserror::Error;

/// Errors that abort a workflow run.
///
/// Export and capture failures deliberately do not appear here; they degrade
/// the [`crate::Outcome`] instead, because a resized window is still a
/// success worth reporting even when the screenshot went wrong.
#[derive(Debug, Error)]
pub enum Error {
    /// The resize itself failed (permission, vanished window, AX refusal).
    #[error(transparent)]
    Resize(#[from] mac_winctl::Error),
}

/// Convenience result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
