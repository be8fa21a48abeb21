use thiserror::Error;

/// Errors produced by the settings layer.
#[derive(Error, Debug)]
pub enum Error {
    /// A preset was constructed with a zero width or height.
    #[error("preset dimensions must be positive: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Saved settings could not be decoded.
    #[error("failed to decode saved settings: {0}")]
    Decode(#[from] serde_json::Error),

    /// The persistence backend rejected a save.
    #[error("settings backend failed to persist")]
    PersistFailed,
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, Error>;
