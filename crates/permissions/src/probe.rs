//! Live probe distinguishing a working Accessibility grant from a stale one.

/// Outcome of one real read-level AX call against a running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The attribute read succeeded.
    Granted,
    /// The call succeeded but the attribute carried no value (e.g. the target
    /// app has no windows). Still proof that the API is enabled.
    NoValue,
    /// The API refused the call outright (`kAXErrorAPIDisabled`): the trust
    /// entry no longer matches this binary's code identity.
    ApiDisabled,
    /// No regular application was available to probe against.
    NoTarget,
}

#[cfg(target_os = "macos")]
mod mac {
    use std::{ffi::c_void, ptr};

    use core_foundation::{
        base::{CFRelease, CFTypeRef, TCFType},
        string::CFString,
    };
    use objc2_app_kit::{NSApplicationActivationPolicy, NSWorkspace};
    use tracing::debug;

    use super::ProbeOutcome;

    #[link(name = "ApplicationServices", kind = "framework")]
    unsafe extern "C" {
        fn AXUIElementCreateApplication(pid: i32) -> *mut c_void;
        fn AXUIElementCopyAttributeValue(
            element: *mut c_void,
            attr: core_foundation::string::CFStringRef,
            value: *mut CFTypeRef,
        ) -> i32;
    }

    const K_AX_ERROR_NO_VALUE: i32 = -25212;
    const K_AX_ERROR_API_DISABLED: i32 = -25211;

    /// Perform one real `AXWindows` read against the first running regular
    /// application (there is almost always at least one, e.g. Finder).
    ///
    /// Success and `NoValue` both prove the API is enabled; only an explicit
    /// `kAXErrorAPIDisabled` signals a stale grant. Other error codes are
    /// treated as benign: the probe's only job is staleness detection.
    pub fn probe_control_api() -> ProbeOutcome {
        let Some(pid) = first_regular_app_pid() else {
            debug!("permission probe: no regular application running");
            return ProbeOutcome::NoTarget;
        };

        let app = unsafe { AXUIElementCreateApplication(pid) };
        if app.is_null() {
            return ProbeOutcome::NoTarget;
        }
        let attr = CFString::new("AXWindows");
        let mut value: CFTypeRef = ptr::null_mut();
        let err = unsafe {
            AXUIElementCopyAttributeValue(app, attr.as_concrete_TypeRef(), &mut value)
        };
        unsafe {
            if !value.is_null() {
                CFRelease(value);
            }
            CFRelease(app as CFTypeRef);
        }
        match err {
            0 => ProbeOutcome::Granted,
            K_AX_ERROR_NO_VALUE => ProbeOutcome::NoValue,
            K_AX_ERROR_API_DISABLED => {
                debug!("permission probe: AX reports api-disabled for pid={}", pid);
                ProbeOutcome::ApiDisabled
            }
            other => {
                debug!("permission probe: pid={} unexpected AX code {}", pid, other);
                ProbeOutcome::Granted
            }
        }
    }

    /// Pid of the first running application with a regular activation policy.
    fn first_regular_app_pid() -> Option<i32> {
        let ws = unsafe { NSWorkspace::sharedWorkspace() };
        let apps = unsafe { ws.runningApplications() };
        for app in apps.iter() {
            if unsafe { app.activationPolicy() } == NSApplicationActivationPolicy::Regular {
                return Some(unsafe { app.processIdentifier() });
            }
        }
        None
    }
}

#[cfg(target_os = "macos")]
pub use mac::probe_control_api;
