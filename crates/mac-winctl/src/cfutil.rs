//! CFDictionary field access for window-list records.
//!
//! Every record coming out of the listing service is a CFDictionary of
//! loosely typed values; these helpers pull out the handful of shapes the
//! discovery code needs, returning `None` for absent keys rather than
//! erroring, since records routinely omit fields (titles most of all).

use core_foundation::{
    base::{CFTypeRef, TCFType},
    dictionary::CFDictionaryRef,
    number::CFNumber,
    string::{CFString, CFStringRef},
};

use crate::geom::Rect;

/// Convert a borrowed CFStringRef into an owned Rust string.
pub(crate) fn cfstring_to_string(s: CFStringRef) -> String {
    // SAFETY: CFStringRef obtained from system APIs; wrap under get rule.
    let cf = unsafe { CFString::wrap_under_get_rule(s) };
    cf.to_string()
}

/// String value under `key`, when present (owner name, window title).
pub(crate) fn dict_get_string(dict: CFDictionaryRef, key: CFStringRef) -> Option<String> {
    let value = unsafe {
        core_foundation::dictionary::CFDictionaryGetValue(dict, key as *const core::ffi::c_void)
    };
    if value.is_null() {
        return None;
    }
    Some(cfstring_to_string(value as CFStringRef))
}

/// Integer value under `key`, when present. Pids, layers and window
/// numbers all arrive as CFNumbers that fit in 32 bits.
pub(crate) fn dict_get_i32(dict: CFDictionaryRef, key: CFStringRef) -> Option<i32> {
    let value = unsafe {
        core_foundation::dictionary::CFDictionaryGetValue(dict, key as *const core::ffi::c_void)
    };
    if value.is_null() {
        return None;
    }
    let n = unsafe { CFNumber::wrap_under_get_rule(value as _) };
    n.to_i64().map(|v| v as i32)
}

/// Floating-point value under `key`, when present.
pub(crate) fn dict_get_f64(dict: CFDictionaryRef, key: CFStringRef) -> Option<f64> {
    let value = unsafe {
        core_foundation::dictionary::CFDictionaryGetValue(dict, key as *const core::ffi::c_void)
    };
    if value.is_null() {
        return None;
    }
    let n = unsafe { CFNumber::wrap_under_get_rule(value as _) };
    n.to_f64()
}

/// Read a `kCGWindowBounds`-style sub-dictionary ({X, Y, Width, Height})
/// into a top-left-origin [`Rect`].
pub(crate) fn dict_get_rect(dict: CFDictionaryRef, key: CFStringRef) -> Option<Rect> {
    let value: CFTypeRef = unsafe {
        core_foundation::dictionary::CFDictionaryGetValue(dict, key as *const core::ffi::c_void)
            as CFTypeRef
    };
    if value.is_null() {
        return None;
    }
    let bounds = value as CFDictionaryRef;
    let kx = CFString::from_static_string("X");
    let ky = CFString::from_static_string("Y");
    let kw = CFString::from_static_string("Width");
    let kh = CFString::from_static_string("Height");
    Some(Rect {
        x: dict_get_f64(bounds, kx.as_concrete_TypeRef())?,
        y: dict_get_f64(bounds, ky.as_concrete_TypeRef())?,
        w: dict_get_f64(bounds, kw.as_concrete_TypeRef())?,
        h: dict_get_f64(bounds, kh.as_concrete_TypeRef())?,
    })
}
