use thiserror::Error;

/// Errors that can occur during window discovery and resizing.
///
/// All of these are local and non-fatal; callers surface them to the user
/// and never retry automatically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Accessibility permission was never granted. Recoverable by prompting.
    #[error("Accessibility permission missing")]
    PermissionDenied,

    /// Accessibility permission is granted per the OS but non-functional
    /// (stale trust entry). Recoverable only by re-authorization in System
    /// Settings.
    #[error("Accessibility permission granted but not functional")]
    PermissionStale,

    /// Failed to create an AX application element for the target pid.
    #[error("Failed to create AX application element")]
    AppElement,

    /// The target process exposes no controllable windows.
    #[error("No controllable windows for process")]
    NoControllableWindows,

    /// The geometry write was rejected (app refuses programmatic resize, or
    /// permission was revoked mid-call).
    #[error("Resize rejected by target: AX code {0}")]
    ResizeRejected(i32),

    /// The AX element became invalid during the operation (window closed).
    #[error("AX element invalid (window gone)")]
    WindowGone,

    /// An AX operation failed with an unclassified error code.
    #[error("AX operation failed: code {0}")]
    AxCode(i32),
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, Error>;
