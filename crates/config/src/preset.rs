//! Window dimension presets.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A window dimension preset, in logical points.
///
/// Used both for the fixed built-in set and for user-defined sizes. The id
/// is assigned at construction and never changes; user presets are added and
/// removed whole, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePreset {
    /// Stable identity for menu selection and removal.
    pub id: Uuid,
    /// Width in logical points, always > 0.
    pub width: u32,
    /// Height in logical points, always > 0.
    pub height: u32,
    /// Optional human-readable label ("Full HD", "MacBook Air 13\"").
    pub label: Option<String>,
}

impl SizePreset {
    /// Construct a preset, rejecting zero dimensions.
    pub fn new(width: u32, height: u32, label: Option<&str>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            width,
            height,
            label: label.map(str::to_string),
        })
    }

    /// Menu display form without the label, e.g. `"1920 x 1080"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} x {}", self.width, self.height)
    }

    /// Display form with a tab-separated label when one exists, e.g.
    /// `"1024 x 768\tXGA"`. The tab is for right-aligned menu rendering.
    #[must_use]
    pub fn display_name_with_label(&self) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => {
                format!("{} x {}\t{}", self.width, self.height, label)
            }
            _ => self.display_name(),
        }
    }
}

/// The 12 built-in presets: Mac Retina logical resolutions followed by
/// common standard display sizes. Not editable by the user.
static BUILTIN: Lazy<Vec<SizePreset>> = Lazy::new(|| {
    [
        (2560, 1600, "MacBook Pro 16\""),
        (2560, 1440, "QHD / iMac"),
        (1728, 1117, "MacBook Pro 14\""),
        (1512, 982, "MacBook Air 15\""),
        (1470, 956, "MacBook Air 13\" M3"),
        (1440, 900, "MacBook Air 13\""),
        (1920, 1080, "Full HD"),
        (1680, 1050, "WSXGA+"),
        (1280, 800, "WXGA"),
        (1280, 720, "HD"),
        (1024, 768, "XGA"),
        (800, 600, "SVGA"),
    ]
    .iter()
    .map(|&(w, h, label)| {
        // Dimensions are compile-time constants, all positive.
        SizePreset::new(w, h, Some(label)).expect("builtin preset dimensions")
    })
    .collect()
});

/// The immutable built-in preset set.
#[must_use]
pub fn builtin_presets() -> &'static [SizePreset] {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(SizePreset::new(0, 600, None).is_err());
        assert!(SizePreset::new(800, 0, None).is_err());
        assert!(SizePreset::new(800, 600, None).is_ok());
    }

    #[test]
    fn builtin_set_is_twelve_and_positive() {
        let builtin = builtin_presets();
        assert_eq!(builtin.len(), 12);
        assert!(builtin.iter().all(|p| p.width > 0 && p.height > 0));
    }

    #[test]
    fn display_names() {
        let plain = SizePreset::new(1920, 1080, None).unwrap();
        assert_eq!(plain.display_name(), "1920 x 1080");
        assert_eq!(plain.display_name_with_label(), "1920 x 1080");

        let labeled = SizePreset::new(1024, 768, Some("XGA")).unwrap();
        assert_eq!(labeled.display_name_with_label(), "1024 x 768\tXGA");
    }
}
