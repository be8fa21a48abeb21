//! macOS Accessibility permission checks for sizefit.
//!
//! Resizing another application's window goes through the AXUIElement API,
//! which macOS gates behind the Accessibility permission in the TCC database.
//! The trust flag alone is a weak signal: after a rebuild with a new code
//! signature the database may still report the *old* entry as trusted while
//! every real AX call fails with `kAXErrorAPIDisabled`. This crate therefore
//! distinguishes three states instead of two:
//!
//! - [`PermissionState::Denied`] — the process was never granted access.
//! - [`PermissionState::StaleGranted`] — the OS reports trusted, but a live
//!   probe against a running application fails. Invisible to the user unless
//!   surfaced; the host should deep-link to the Accessibility settings pane.
//! - [`PermissionState::Functional`] — trusted and the probe succeeds.
//!
//! [`state`] is recomputed on every call and must run before every mutating
//! window operation; the user can revoke the permission at any time through
//! System Settings.

use serde::{Deserialize, Serialize};

mod probe;

pub use probe::ProbeOutcome;
#[cfg(target_os = "macos")]
pub use probe::probe_control_api;

/// Permission state as observed right now. Never cache this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    /// The OS trust flag is off; the user never granted access (or revoked it).
    Denied,
    /// Trusted according to the OS, but control calls fail. Typically a stale
    /// TCC entry left behind by a code-identity change.
    StaleGranted,
    /// Trusted and verified working by a live probe.
    Functional,
}

impl PermissionState {
    /// True only when real control calls are expected to succeed.
    #[must_use]
    pub fn is_functional(self) -> bool {
        matches!(self, Self::Functional)
    }
}

/// Combine the OS trust flag with a probe outcome.
///
/// Only an explicit `ApiDisabled` report downgrades a granted permission to
/// stale; `NoValue` and `NoTarget` are ordinary outcomes (an app with no
/// windows, or no regular app running to probe) and leave the flag trusted.
#[must_use]
pub fn classify(granted: bool, probe: ProbeOutcome) -> PermissionState {
    if !granted {
        return PermissionState::Denied;
    }
    match probe {
        ProbeOutcome::ApiDisabled => PermissionState::StaleGranted,
        ProbeOutcome::Granted | ProbeOutcome::NoValue | ProbeOutcome::NoTarget => {
            PermissionState::Functional
        }
    }
}

#[cfg(target_os = "macos")]
#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(
        options: core_foundation::dictionary::CFDictionaryRef,
    ) -> bool;
    static kAXTrustedCheckOptionPrompt: core_foundation::string::CFStringRef;
}

/// Check the OS trust flag for this process. Fast, no side effects.
///
/// A `true` here does not guarantee that AX calls work; see [`state`].
#[cfg(target_os = "macos")]
#[must_use]
pub fn granted() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Derive the current [`PermissionState`] from the trust flag plus a live
/// probe. Recomputed fresh on every call.
#[cfg(target_os = "macos")]
#[must_use]
pub fn state() -> PermissionState {
    let ok = granted();
    // Skip the probe entirely when the flag is off; it cannot upgrade Denied.
    let probe = if ok {
        probe_control_api()
    } else {
        ProbeOutcome::NoTarget
    };
    let st = classify(ok, probe);
    tracing::debug!("permission state: granted={} probe={:?} -> {:?}", ok, probe, st);
    st
}

/// Trigger the system consent prompt for Accessibility access.
///
/// Fire-and-forget: macOS shows the dialog asynchronously and this function
/// does not wait for the user's answer. Callers re-check [`state`] on the
/// next user action.
#[cfg(target_os = "macos")]
pub fn request() {
    use core_foundation::{
        base::TCFType,
        boolean::CFBoolean,
        dictionary::CFDictionary,
        string::CFString,
    };
    let key = unsafe { CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt) };
    let opts = CFDictionary::from_CFType_pairs(&[(key.as_CFType(), CFBoolean::true_value().as_CFType())]);
    let _ = unsafe { AXIsProcessTrustedWithOptions(opts.as_concrete_TypeRef()) };
}

/// Open System Settings at Privacy & Security → Accessibility.
///
/// This is the guidance action for [`PermissionState::StaleGranted`]: the OS
/// still reports "trusted" so re-prompting does nothing, and the user must
/// remove and re-add the app in the settings pane. The URL scheme deep-links
/// to the right pane on both System Preferences and System Settings.
#[cfg(target_os = "macos")]
pub fn open_accessibility_settings() -> bool {
    use objc2_app_kit::NSWorkspace;
    use objc2_foundation::{NSString, NSURL};

    let url = unsafe {
        NSURL::URLWithString(&NSString::from_str(
            "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility",
        ))
    };
    match url {
        Some(url) => unsafe { NSWorkspace::sharedWorkspace().openURL(&url) },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_wins_regardless_of_probe() {
        for probe in [
            ProbeOutcome::Granted,
            ProbeOutcome::NoValue,
            ProbeOutcome::ApiDisabled,
            ProbeOutcome::NoTarget,
        ] {
            assert_eq!(classify(false, probe), PermissionState::Denied);
        }
    }

    #[test]
    fn api_disabled_marks_granted_as_stale() {
        assert_eq!(
            classify(true, ProbeOutcome::ApiDisabled),
            PermissionState::StaleGranted
        );
    }

    #[test]
    fn benign_probe_outcomes_are_functional() {
        assert_eq!(classify(true, ProbeOutcome::Granted), PermissionState::Functional);
        assert_eq!(classify(true, ProbeOutcome::NoValue), PermissionState::Functional);
        // No regular app running to probe: trust the flag.
        assert_eq!(classify(true, ProbeOutcome::NoTarget), PermissionState::Functional);
    }

    #[test]
    fn functional_implies_granted() {
        // The classifier can never report a working permission without the
        // flag; this is the invariant callers rely on to skip the probe.
        assert!(!classify(false, ProbeOutcome::Granted).is_functional());
    }
}
