//! Accessibility (AXUIElement) FFI helpers.
//!
//! The control service reports per-call outcomes that matter individually:
//! success, success-with-no-value, and "api disabled". The last one is not an
//! ordinary absence — it means the trust entry is stale — so attribute reads
//! surface an explicit [`AxOutcome`] instead of collapsing to a boolean.

use std::{cell::RefCell, collections::HashMap, ffi::c_void, ptr, thread_local};

use core_foundation::{
    base::{CFRelease, CFTypeRef, TCFType},
    string::{CFString, CFStringRef},
};

use crate::error::{Error, Result};

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    pub(crate) fn AXUIElementCreateApplication(pid: i32) -> *mut c_void;
    pub(crate) fn AXUIElementCopyAttributeValue(
        element: *mut c_void,
        attr: CFStringRef,
        value: *mut CFTypeRef,
    ) -> i32;
    fn AXUIElementSetAttributeValue(
        element: *mut c_void,
        attr: CFStringRef,
        value: CFTypeRef,
    ) -> i32;

    // AXValue helpers for CGSize
    fn AXValueCreate(theType: i32, valuePtr: *const c_void) -> CFTypeRef;
}

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    fn CFRetain(cf: CFTypeRef) -> CFTypeRef;
}

// AXValue type constant (per Apple docs)
const K_AX_VALUE_CGSIZE_TYPE: i32 = 2;
// AX error codes we classify explicitly.
const K_AX_ERROR_API_DISABLED: i32 = -25211;
const K_AX_ERROR_NO_VALUE: i32 = -25212;
const K_AX_ERROR_INVALID_UI_ELEMENT: i32 = -25202;

/// CGSize mirror for AXValue interop.
#[repr(C)]
struct AxSize {
    width: f64,
    height: f64,
}

thread_local! {
    static ATTR_STRINGS: RefCell<HashMap<&'static str, CFString>> = RefCell::new(HashMap::new());
}

/// Return a stable CFStringRef for known attribute names. This avoids
/// relying on toll-free bridging of static strings, which can trip pointer
/// authentication on recent macOS versions.
pub(crate) fn cfstr(name: &'static str) -> CFStringRef {
    ATTR_STRINGS.with(|cell| {
        let mut m = cell.borrow_mut();
        let s = m.entry(name).or_insert_with(|| CFString::new(name));
        s.as_concrete_TypeRef()
    })
}

/// RAII guard that releases a retained AX element on drop.
pub(crate) struct AXElem(*mut c_void);

impl AXElem {
    /// Wrap a pointer returned under the create rule. None when null.
    pub(crate) fn from_create(ptr: *mut c_void) -> Option<Self> {
        if ptr.is_null() { None } else { Some(Self(ptr)) }
    }

    /// Retain a borrowed pointer (e.g. out of a CFArray) and own it.
    pub(crate) fn retain_from_borrowed(ptr: *mut c_void) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        unsafe { CFRetain(ptr as CFTypeRef) };
        Some(Self(ptr))
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl Drop for AXElem {
    fn drop(&mut self) {
        unsafe { CFRelease(self.0 as CFTypeRef) };
    }
}

/// Tri-state outcome of an AX attribute read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxOutcome<T> {
    /// The attribute carried a value.
    Value(T),
    /// The call succeeded but the attribute has no value.
    NoValue,
    /// The API refused the call: stale or revoked trust entry.
    ApiDisabled,
}

/// Read a string attribute (e.g. `AXTitle`) from an element.
pub(crate) fn ax_string(element: *mut c_void, attr: CFStringRef) -> Result<AxOutcome<String>> {
    let mut v: CFTypeRef = ptr::null_mut();
    let err = unsafe { AXUIElementCopyAttributeValue(element, attr, &mut v) };
    match err {
        0 => {}
        K_AX_ERROR_NO_VALUE => return Ok(AxOutcome::NoValue),
        K_AX_ERROR_API_DISABLED => return Ok(AxOutcome::ApiDisabled),
        K_AX_ERROR_INVALID_UI_ELEMENT => return Err(Error::WindowGone),
        other => return Err(Error::AxCode(other)),
    }
    if v.is_null() {
        return Ok(AxOutcome::NoValue);
    }
    let s = unsafe { CFString::wrap_under_create_rule(v as CFStringRef) };
    Ok(AxOutcome::Value(s.to_string()))
}

/// Copy the controllable window elements of a process, in AX list order.
///
/// Maps "api disabled" to [`Error::PermissionStale`] so callers don't
/// confuse it with a process that simply has no windows.
pub(crate) fn copy_window_elements(pid: i32) -> Result<Vec<AXElem>> {
    let app = AXElem::from_create(unsafe { AXUIElementCreateApplication(pid) })
        .ok_or(Error::AppElement)?;

    let mut wins_ref: CFTypeRef = ptr::null_mut();
    let err = unsafe {
        AXUIElementCopyAttributeValue(app.as_ptr(), cfstr("AXWindows"), &mut wins_ref)
    };
    match err {
        0 => {}
        K_AX_ERROR_NO_VALUE => return Ok(Vec::new()),
        K_AX_ERROR_API_DISABLED => return Err(Error::PermissionStale),
        other => return Err(Error::AxCode(other)),
    }
    if wins_ref.is_null() {
        return Ok(Vec::new());
    }

    let arr = unsafe {
        core_foundation::array::CFArray::<*const c_void>::wrap_under_create_rule(wins_ref as _)
    };
    let mut out = Vec::new();
    for i in 0..unsafe { core_foundation::array::CFArrayGetCount(arr.as_concrete_TypeRef()) } {
        let wref =
            unsafe { core_foundation::array::CFArrayGetValueAtIndex(arr.as_concrete_TypeRef(), i) }
                as *mut c_void;
        // Retain each window element so it outlives the array release.
        if let Some(elem) = AXElem::retain_from_borrowed(wref) {
            out.push(elem);
        }
    }
    Ok(out)
}

/// Write the `AXSize` attribute on a window element.
pub(crate) fn set_window_size(element: *mut c_void, width: f64, height: f64) -> Result<()> {
    let size = AxSize { width, height };
    let v = unsafe { AXValueCreate(K_AX_VALUE_CGSIZE_TYPE, &size as *const _ as *const c_void) };
    if v.is_null() {
        return Err(Error::ResizeRejected(0));
    }
    let err = unsafe { AXUIElementSetAttributeValue(element, cfstr("AXSize"), v) };
    unsafe { CFRelease(v) };
    match err {
        0 => Ok(()),
        K_AX_ERROR_API_DISABLED => Err(Error::PermissionStale),
        K_AX_ERROR_INVALID_UI_ELEMENT => Err(Error::WindowGone),
        other => Err(Error::ResizeRejected(other)),
    }
}
