//! Resizing a discovered window through the control service.

use tracing::{debug, info};

use crate::{
    ax::{self, AxOutcome},
    error::{Error, Result},
    matching::{Candidate, select_target},
    window::WindowInfo,
};

/// Resize `info`'s window to `width` × `height` logical points.
///
/// The permission state is recomputed on entry — never assumed — because the
/// user can revoke or invalidate the grant at any time between calls.
///
/// Since the listing and control services share no window identifier, the
/// target is located by reading every AX window title for the owning process
/// and delegating to [`select_target`] (exact match, then first-window
/// fallback). See the `matching` module for the rationale.
pub fn resize_window(info: &WindowInfo, width: u32, height: u32) -> Result<()> {
    info!(
        "resize_window: pid={} id={} '{}' -> {}x{}",
        info.pid, info.id, info.title, width, height
    );
    match permissions::state() {
        permissions::PermissionState::Denied => return Err(Error::PermissionDenied),
        permissions::PermissionState::StaleGranted => return Err(Error::PermissionStale),
        permissions::PermissionState::Functional => {}
    }

    let windows = ax::copy_window_elements(info.pid)?;
    if windows.is_empty() {
        return Err(Error::NoControllableWindows);
    }

    let candidates: Vec<Candidate> = windows
        .iter()
        .enumerate()
        .map(|(index, w)| {
            let title = match ax::ax_string(w.as_ptr(), ax::cfstr("AXTitle")) {
                Ok(AxOutcome::Value(t)) => t,
                // Missing/unreadable titles participate as empty strings so
                // the "both empty" match still works.
                _ => String::new(),
            };
            Candidate { index, title }
        })
        .collect();

    let idx = select_target(&candidates, &info.title).ok_or(Error::NoControllableWindows)?;
    if candidates[idx].title != info.title {
        debug!(
            "resize_window: no title match for '{}'; falling back to first window",
            info.title
        );
    }

    ax::set_window_size(windows[idx].as_ptr(), f64::from(width), f64::from(height))
}
