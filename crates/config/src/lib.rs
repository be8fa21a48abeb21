//! Size presets and user settings for sizefit.
//!
//! The core never talks to a global settings singleton. Hosts construct a
//! [`SettingsStore`] with an injected [`SettingsBackend`] for persistence and
//! subscribe to change events over a channel; consumers receive plain data
//! ([`SizePreset`], [`Settings`]) by value.

mod error;
mod preset;
mod store;

pub use error::{Error, Result};
pub use preset::{SizePreset, builtin_presets};
pub use store::{
    JsonFileBackend, MemoryBackend, Settings, SettingsBackend, SettingsEvent, SettingsStore,
};
