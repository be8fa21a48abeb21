//! Placing a capture on the system pasteboard.

use objc2_app_kit::{NSPasteboard, NSPasteboardTypePNG};
use objc2_foundation::NSData;
use tracing::warn;

use crate::{export, frame::Capture};

/// Encode `capture` as PNG and put it on the general pasteboard.
///
/// Best-effort: failures are logged and reported as `false` so they never
/// mask a successful resize or file export. The pHYs density travels with
/// the PNG data, so pasted images keep their logical size too.
pub fn copy_to_clipboard(capture: &Capture) -> bool {
    let mut bytes = Vec::new();
    if let Err(err) = export::encode_png(capture, &mut bytes) {
        warn!("copy_to_clipboard: png encode failed: {err}");
        return false;
    }
    let data = NSData::with_bytes(&bytes);
    let pasteboard = unsafe { NSPasteboard::generalPasteboard() };
    let _ = unsafe { pasteboard.clearContents() };
    let ok = unsafe { pasteboard.setData_forType(Some(&data), NSPasteboardTypePNG) };
    if !ok {
        warn!("copy_to_clipboard: pasteboard rejected png data");
    }
    ok
}
