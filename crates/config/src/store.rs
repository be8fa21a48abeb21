//! Settings store with injected persistence and channel-based notification.

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    preset::{SizePreset, builtin_presets},
};

/// User preferences persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// User-defined presets, appended after the built-in set.
    pub custom_sizes: Vec<SizePreset>,
    /// Master switch for post-resize screenshots.
    pub screenshot_enabled: bool,
    /// Write captured screenshots to `screenshot_save_folder`.
    pub screenshot_save_to_file: bool,
    /// Put captured screenshots on the clipboard.
    pub screenshot_copy_to_clipboard: bool,
    /// Destination folder for saved screenshots; `None` until chosen.
    pub screenshot_save_folder: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_sizes: Vec::new(),
            screenshot_enabled: false,
            // Saving to file is the expected default once screenshots are on.
            screenshot_save_to_file: true,
            screenshot_copy_to_clipboard: false,
            screenshot_save_folder: None,
        }
    }
}

/// Change notifications emitted by [`SettingsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    /// The preset list changed; menus should rebuild.
    PresetsChanged,
    /// A screenshot flag or the save folder changed.
    FlagsChanged,
}

/// Persistence seam for [`SettingsStore`].
///
/// The store serializes settings to JSON and hands the string to the
/// backend; hosts decide where it lives (a file, user defaults, a test map).
pub trait SettingsBackend: Send {
    /// Load the previously saved blob, if any.
    fn load(&self) -> Option<String>;
    /// Save the blob; `false` on write failure.
    fn save(&self, data: &str) -> bool;
}

/// File-backed JSON persistence.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Persist settings at `path`; parent directories must already exist.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn save(&self, data: &str) -> bool {
        match std::fs::write(&self.path, data) {
            Ok(()) => true,
            Err(e) => {
                warn!("settings save failed at {:?}: {}", self.path, e);
                false
            }
        }
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    data: std::sync::Mutex<Option<String>>,
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Option<String> {
        self.data.lock().ok().and_then(|g| g.clone())
    }

    fn save(&self, data: &str) -> bool {
        if let Ok(mut g) = self.data.lock() {
            *g = Some(data.to_string());
            true
        } else {
            false
        }
    }
}

/// Owner of the current [`Settings`], persisting on every mutation and
/// notifying subscribers over channels.
pub struct SettingsStore {
    settings: Settings,
    backend: Box<dyn SettingsBackend>,
    subscribers: Vec<Sender<SettingsEvent>>,
}

impl SettingsStore {
    /// Load settings through `backend`, falling back to defaults when
    /// nothing is saved yet or the saved blob fails to decode.
    #[must_use]
    pub fn new(backend: Box<dyn SettingsBackend>) -> Self {
        let settings = match backend.load() {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(s) => s,
                Err(e) => {
                    warn!("discarding undecodable saved settings: {}", e);
                    Settings::default()
                }
            },
            None => Settings::default(),
        };
        Self {
            settings,
            backend,
            subscribers: Vec::new(),
        }
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All presets in menu order: built-in set followed by custom sizes.
    #[must_use]
    pub fn all_presets(&self) -> Vec<SizePreset> {
        let mut out = builtin_presets().to_vec();
        out.extend(self.settings.custom_sizes.iter().cloned());
        out
    }

    /// Subscribe to change events. Disconnected receivers are pruned on the
    /// next emission.
    pub fn subscribe(&mut self) -> Receiver<SettingsEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Append a user-defined preset.
    pub fn add_size(&mut self, preset: SizePreset) -> Result<()> {
        debug!("add custom preset {}", preset.display_name());
        self.settings.custom_sizes.push(preset);
        self.persist()?;
        self.emit(SettingsEvent::PresetsChanged);
        Ok(())
    }

    /// Remove a user-defined preset by id; built-ins cannot be removed.
    pub fn remove_size(&mut self, id: Uuid) -> Result<bool> {
        let before = self.settings.custom_sizes.len();
        self.settings.custom_sizes.retain(|p| p.id != id);
        if self.settings.custom_sizes.len() == before {
            return Ok(false);
        }
        self.persist()?;
        self.emit(SettingsEvent::PresetsChanged);
        Ok(true)
    }

    /// Toggle post-resize screenshots.
    pub fn set_screenshot_enabled(&mut self, on: bool) -> Result<()> {
        self.settings.screenshot_enabled = on;
        self.persist()?;
        self.emit(SettingsEvent::FlagsChanged);
        Ok(())
    }

    /// Toggle saving captures to file.
    pub fn set_save_to_file(&mut self, on: bool) -> Result<()> {
        self.settings.screenshot_save_to_file = on;
        self.persist()?;
        self.emit(SettingsEvent::FlagsChanged);
        Ok(())
    }

    /// Toggle copying captures to the clipboard.
    pub fn set_copy_to_clipboard(&mut self, on: bool) -> Result<()> {
        self.settings.screenshot_copy_to_clipboard = on;
        self.persist()?;
        self.emit(SettingsEvent::FlagsChanged);
        Ok(())
    }

    /// Set or clear the screenshot destination folder.
    pub fn set_save_folder(&mut self, folder: Option<PathBuf>) -> Result<()> {
        self.settings.screenshot_save_folder = folder;
        self.persist()?;
        self.emit(SettingsEvent::FlagsChanged);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.settings)?;
        if self.backend.save(&blob) {
            Ok(())
        } else {
            Err(Error::PersistFailed)
        }
    }

    fn emit(&mut self, event: SettingsEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SettingsStore {
        SettingsStore::new(Box::new(MemoryBackend::default()))
    }

    #[test]
    fn defaults_save_to_file_on() {
        let s = store();
        assert!(s.settings().screenshot_save_to_file);
        assert!(!s.settings().screenshot_enabled);
    }

    #[test]
    fn all_presets_is_builtin_then_custom() {
        let mut s = store();
        let custom = SizePreset::new(640, 480, Some("VGA")).unwrap();
        s.add_size(custom.clone()).unwrap();
        let all = s.all_presets();
        assert_eq!(all.len(), 13);
        assert_eq!(all.last(), Some(&custom));
    }

    #[test]
    fn add_remove_round_trips_through_backend() {
        let backend = Box::new(MemoryBackend::default());
        let mut s = SettingsStore::new(backend);
        let custom = SizePreset::new(1000, 700, None).unwrap();
        let id = custom.id;
        s.add_size(custom).unwrap();
        assert!(s.remove_size(id).unwrap());
        assert!(!s.remove_size(id).unwrap());
    }

    #[test]
    fn mutations_notify_subscribers() {
        let mut s = store();
        let rx = s.subscribe();
        s.add_size(SizePreset::new(500, 500, None).unwrap()).unwrap();
        assert_eq!(rx.try_recv(), Ok(SettingsEvent::PresetsChanged));
        s.set_screenshot_enabled(true).unwrap();
        assert_eq!(rx.try_recv(), Ok(SettingsEvent::FlagsChanged));
    }

    #[test]
    fn json_file_backend_persists_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(JsonFileBackend::new(&path).load(), None);

        let mut s = SettingsStore::new(Box::new(JsonFileBackend::new(&path)));
        s.add_size(SizePreset::new(640, 480, Some("VGA")).unwrap())
            .unwrap();
        s.set_screenshot_enabled(true).unwrap();
        drop(s);

        let reloaded = SettingsStore::new(Box::new(JsonFileBackend::new(&path)));
        assert_eq!(reloaded.settings().custom_sizes.len(), 1);
        assert!(reloaded.settings().screenshot_enabled);
    }

    #[test]
    fn json_file_backend_reports_unwritable_path() {
        let backend = JsonFileBackend::new(Path::new("/definitely/not/here/settings.json"));
        assert!(!backend.save("{}"));
    }

    #[test]
    fn reload_restores_custom_sizes() {
        let backend = MemoryBackend::default();
        let blob = {
            let mut s = SettingsStore::new(Box::new(MemoryBackend::default()));
            s.add_size(SizePreset::new(900, 900, None).unwrap()).unwrap();
            serde_json::to_string(s.settings()).unwrap()
        };
        backend.save(&blob);
        let reloaded = SettingsStore::new(Box::new(backend));
        assert_eq!(reloaded.settings().custom_sizes.len(), 1);
    }
}
