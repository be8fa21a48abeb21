//! Window discovery via the CGWindowList listing service.

use crate::geom::Rect;

/// Alias for CoreGraphics CGWindowID (`kCGWindowNumber`).
pub type WindowId = u32;

/// Immutable snapshot of a window's identity and geometry, sourced from the
/// listing service. Bounds use a top-left screen origin.
///
/// Snapshots carry no persistent identity: the window set changes
/// continuously, so callers re-run [`list_windows`] whenever they need a
/// current view and discard descriptors after use.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    /// Listing-service window id.
    pub id: WindowId,
    /// Owning process id.
    pub pid: i32,
    /// Owning application name.
    pub app: String,
    /// Window title; empty for untitled or title-withheld windows.
    pub title: String,
    /// Window bounds, top-left origin, always positive-area.
    pub bounds: Rect,
}

/// Raw fields pulled from one listing-service record before filtering.
#[derive(Debug, Clone)]
pub(crate) struct RawRecord {
    pub(crate) id: u32,
    pub(crate) pid: i32,
    pub(crate) layer: i32,
    pub(crate) app: String,
    pub(crate) title: String,
    pub(crate) bounds: Option<Rect>,
}

/// Apply the discovery filters to one raw record.
///
/// Keeps only layer-0 application windows (menus, tooltips and overlays
/// live on other layers), drops this process's own windows, and drops
/// zero-area entries such as hidden helper windows.
pub(crate) fn normalize(raw: RawRecord, own_pid: i32) -> Option<WindowInfo> {
    if raw.layer != 0 {
        return None;
    }
    if raw.pid == own_pid {
        return None;
    }
    let bounds = raw.bounds?;
    if bounds.w <= 0.0 || bounds.h <= 0.0 {
        return None;
    }
    Some(WindowInfo {
        id: raw.id,
        pid: raw.pid,
        app: raw.app,
        title: raw.title,
        bounds,
    })
}

#[cfg(target_os = "macos")]
mod mac {
    use std::ffi::c_void;

    use core_foundation::{
        array::{CFArray, CFArrayGetCount, CFArrayGetValueAtIndex},
        base::{CFTypeRef, TCFType},
        dictionary::CFDictionaryRef,
    };
    use core_graphics::window as cgw;
    use tracing::{trace, warn};

    use super::{RawRecord, WindowInfo, normalize};
    use crate::cfutil::{dict_get_i32, dict_get_rect, dict_get_string};

    #[link(name = "CoreGraphics", kind = "framework")]
    unsafe extern "C" {
        fn CGWindowListCopyWindowInfo(option: u32, relativeToWindow: u32) -> CFTypeRef; // CFArrayRef
    }

    const K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY: u32 = 1 << 0;
    const K_CG_WINDOW_LIST_OPTION_EXCLUDE_DESKTOP_ELEMENTS: u32 = 1 << 4;

    /// Enumerate all visible, resizable application windows on screen.
    ///
    /// Recomputed in full on every call; the result order is whatever the
    /// compositor returns and callers re-sort for display as needed.
    pub fn list_windows() -> Vec<WindowInfo> {
        trace!("list_windows");
        let own_pid = std::process::id() as i32;
        let mut out = Vec::new();
        unsafe {
            let arr_ref = CGWindowListCopyWindowInfo(
                K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY
                    | K_CG_WINDOW_LIST_OPTION_EXCLUDE_DESKTOP_ELEMENTS,
                0,
            );
            if arr_ref.is_null() {
                warn!("list_windows: CGWindowListCopyWindowInfo returned null");
                return out;
            }
            let arr: CFArray<*const c_void> = CFArray::wrap_under_create_rule(arr_ref as _);
            let key_pid = cgw::kCGWindowOwnerPID;
            let key_layer = cgw::kCGWindowLayer;
            let key_num = cgw::kCGWindowNumber;
            let key_app = cgw::kCGWindowOwnerName;
            let key_title = cgw::kCGWindowName;
            let key_bounds = cgw::kCGWindowBounds;
            #[allow(non_snake_case)]
            unsafe extern "C" {
                fn CFGetTypeID(cf: CFTypeRef) -> u64;
                fn CFDictionaryGetTypeID() -> u64;
            }
            for i in 0..CFArrayGetCount(arr.as_concrete_TypeRef()) {
                let item = CFArrayGetValueAtIndex(arr.as_concrete_TypeRef(), i) as CFTypeRef;
                if item.is_null() || CFGetTypeID(item) != CFDictionaryGetTypeID() {
                    continue;
                }
                let d = item as CFDictionaryRef;
                let pid = match dict_get_i32(d, key_pid) {
                    Some(p) => p,
                    None => continue,
                };
                let id = match dict_get_i32(d, key_num) {
                    Some(n) if n > 0 => n as u32,
                    _ => continue,
                };
                let raw = RawRecord {
                    id,
                    pid,
                    layer: dict_get_i32(d, key_layer).unwrap_or(0),
                    app: dict_get_string(d, key_app).unwrap_or_default(),
                    title: dict_get_string(d, key_title).unwrap_or_default(),
                    bounds: dict_get_rect(d, key_bounds),
                };
                if let Some(info) = normalize(raw, own_pid) {
                    out.push(info);
                }
            }
        }
        out
    }
}

#[cfg(target_os = "macos")]
pub use mac::list_windows;

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: u32, pid: i32, layer: i32, w: f64, h: f64) -> RawRecord {
        RawRecord {
            id,
            pid,
            layer,
            app: "App".into(),
            title: "Window".into(),
            bounds: Some(Rect::new(0.0, 0.0, w, h)),
        }
    }

    const OWN_PID: i32 = 4242;

    #[test]
    fn keeps_ordinary_layer_zero_window() {
        let info = normalize(raw(7, 100, 0, 800.0, 600.0), OWN_PID).unwrap();
        assert_eq!(info.id, 7);
        assert!(info.bounds.w > 0.0 && info.bounds.h > 0.0);
        assert_ne!(info.pid, OWN_PID);
    }

    #[test]
    fn drops_non_zero_layers() {
        // Menus, tooltips and overlays live above layer 0.
        assert!(normalize(raw(1, 100, 25, 800.0, 600.0), OWN_PID).is_none());
        assert!(normalize(raw(2, 100, -1, 800.0, 600.0), OWN_PID).is_none());
    }

    #[test]
    fn drops_own_process_windows() {
        assert!(normalize(raw(3, OWN_PID, 0, 800.0, 600.0), OWN_PID).is_none());
    }

    #[test]
    fn drops_zero_area_windows() {
        assert!(normalize(raw(4, 100, 0, 0.0, 600.0), OWN_PID).is_none());
        assert!(normalize(raw(5, 100, 0, 800.0, 0.0), OWN_PID).is_none());
    }

    #[test]
    fn drops_records_without_bounds() {
        let mut r = raw(6, 100, 0, 800.0, 600.0);
        r.bounds = None;
        assert!(normalize(r, OWN_PID).is_none());
    }
}
