//! Trait abstraction over the platform services, to improve testability.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mac_capture::Capture;
use mac_winctl::{Result as WinResult, WindowId, WindowInfo};

/// Platform operations the engine sequences.
///
/// Production code uses [`RealWinOps`]; tests drive the engine through
/// [`MockWinOps`] so the whole workflow runs without a window server.
#[async_trait]
pub trait WinOps: Send + Sync {
    /// Enumerate resizable application windows.
    fn list_windows(&self) -> Vec<WindowInfo>;
    /// Resize `info`'s window to `width` × `height` points.
    fn resize_window(&self, info: &WindowInfo, width: u32, height: u32) -> WinResult<()>;
    /// Capture one frame of window `id`; `None` when the window is gone or
    /// capture failed.
    async fn capture_window(&self, id: WindowId) -> Option<Capture>;
    /// Write `capture` into `dir` as a timestamped PNG.
    fn export_png(
        &self,
        capture: &Capture,
        dir: &Path,
        owner: &str,
        title: &str,
    ) -> mac_capture::Result<PathBuf>;
    /// Put `capture` on the system pasteboard. Best-effort.
    fn copy_to_clipboard(&self, capture: &Capture) -> bool;
}

/// Production implementation delegating to the platform crates.
#[cfg(target_os = "macos")]
pub struct RealWinOps;

#[cfg(target_os = "macos")]
#[async_trait]
impl WinOps for RealWinOps {
    fn list_windows(&self) -> Vec<WindowInfo> {
        mac_winctl::list_windows()
    }
    fn resize_window(&self, info: &WindowInfo, width: u32, height: u32) -> WinResult<()> {
        mac_winctl::resize_window(info, width, height)
    }
    async fn capture_window(&self, id: WindowId) -> Option<Capture> {
        mac_capture::capture_window(id).await
    }
    fn export_png(
        &self,
        capture: &Capture,
        dir: &Path,
        owner: &str,
        title: &str,
    ) -> mac_capture::Result<PathBuf> {
        mac_capture::export_png(capture, dir, owner, title)
    }
    fn copy_to_clipboard(&self, capture: &Capture) -> bool {
        mac_capture::copy_to_clipboard(capture)
    }
}

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

/// Scripted implementation for tests.
///
/// Records every call and lets tests inject windows, a canned capture, and
/// per-operation failures.
#[derive(Clone, Default)]
pub struct MockWinOps {
    calls: Arc<Mutex<Vec<String>>>,
    windows: Arc<Mutex<Vec<WindowInfo>>>,
    capture: Arc<Mutex<Option<Capture>>>,
    resizes: Arc<Mutex<Vec<(WindowId, u32, u32)>>>,
    exports: Arc<Mutex<Vec<PathBuf>>>,
    fail_resize: Arc<Mutex<Option<mac_winctl::Error>>>,
    fail_export: Arc<AtomicBool>,
    fail_clipboard: Arc<AtomicBool>,
}

impl MockWinOps {
    /// Fresh mock with no windows, no capture, nothing failing.
    pub fn new() -> Self {
        Self::default()
    }
    /// Replace the window list returned by `list_windows`.
    pub fn set_windows(&self, wins: Vec<WindowInfo>) {
        *self.windows.lock() = wins;
    }
    /// Set the capture handed out by `capture_window`.
    pub fn set_capture(&self, cap: Option<Capture>) {
        *self.capture.lock() = cap;
    }
    /// Make `resize_window` fail with `err`.
    pub fn set_fail_resize(&self, err: Option<mac_winctl::Error>) {
        *self.fail_resize.lock() = err;
    }
    /// Make `export_png` fail.
    pub fn set_fail_export(&self, v: bool) {
        self.fail_export.store(v, Ordering::SeqCst);
    }
    /// Make `copy_to_clipboard` report failure.
    pub fn set_fail_clipboard(&self, v: bool) {
        self.fail_clipboard.store(v, Ordering::SeqCst);
    }
    /// Whether a call named `s` was made.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }
    /// Recorded `(id, width, height)` triples from successful resizes.
    pub fn resizes(&self) -> Vec<(WindowId, u32, u32)> {
        self.resizes.lock().clone()
    }
    /// Paths handed back from successful exports.
    pub fn exports(&self) -> Vec<PathBuf> {
        self.exports.lock().clone()
    }
    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

#[async_trait]
impl WinOps for MockWinOps {
    fn list_windows(&self) -> Vec<WindowInfo> {
        self.note("list_windows");
        self.windows.lock().clone()
    }
    fn resize_window(&self, info: &WindowInfo, width: u32, height: u32) -> WinResult<()> {
        self.note("resize_window");
        if let Some(err) = *self.fail_resize.lock() {
            return Err(err);
        }
        self.resizes.lock().push((info.id, width, height));
        Ok(())
    }
    async fn capture_window(&self, _id: WindowId) -> Option<Capture> {
        self.note("capture_window");
        self.capture.lock().clone()
    }
    fn export_png(
        &self,
        _capture: &Capture,
        dir: &Path,
        owner: &str,
        _title: &str,
    ) -> mac_capture::Result<PathBuf> {
        self.note("export_png");
        if self.fail_export.load(Ordering::SeqCst) {
            return Err(mac_capture::Error::Write {
                path: dir.to_path_buf(),
                source: std::io::Error::other("scripted export failure"),
            });
        }
        let path = dir.join(format!("{owner}.png"));
        self.exports.lock().push(path.clone());
        Ok(path)
    }
    fn copy_to_clipboard(&self, _capture: &Capture) -> bool {
        self.note("copy_to_clipboard");
        !self.fail_clipboard.load(Ordering::SeqCst)
    }
}
