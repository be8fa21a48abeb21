//! Per-display backing-scale lookup.
//!
//! Window bounds from the listing service use a top-left global origin while
//! screen frames use a bottom-left origin, so the two cannot be compared
//! directly. Each screen frame is flipped into top-left space (relative to
//! the primary screen's height) before hit-testing the window's center.

use mac_winctl::Rect;

/// Scale used when no screen information is available at all. Retina is the
/// common case on the hardware this runs on.
const DEFAULT_SCALE: f64 = 2.0;

/// Frame and backing scale of one attached display.
///
/// `frame` uses the bottom-left global origin the screen service reports;
/// the primary screen (index 0) has its origin at (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFrame {
    /// Screen frame in points, bottom-left origin.
    pub frame: Rect,
    /// Backing scale factor (1.0 non-Retina, 2.0 Retina).
    pub scale: f64,
}

/// Backing scale of the display containing `rect`'s center.
///
/// Falls back to the primary screen's scale when the center lies on no
/// screen (mid-resize, or a window straddling a disconnected display), and
/// to [`DEFAULT_SCALE`] when the screen list is empty.
pub fn scale_for_rect(screens: &[ScreenFrame], rect: &Rect) -> f64 {
    let Some(primary) = screens.first() else {
        return DEFAULT_SCALE;
    };
    let primary_h = primary.frame.h;
    let (cx, cy) = (rect.cx(), rect.cy());
    for s in screens {
        let flipped = Rect::new(
            s.frame.x,
            primary_h - s.frame.y - s.frame.h,
            s.frame.w,
            s.frame.h,
        );
        if flipped.contains(cx, cy) {
            return s.scale;
        }
    }
    primary.scale
}

#[cfg(target_os = "macos")]
mod mac {
    use objc2_app_kit::NSScreen;
    use objc2_foundation::MainThreadMarker;
    use tracing::debug;

    use super::ScreenFrame;
    use mac_winctl::Rect;

    /// Snapshot the attached screens' frames and backing scales.
    ///
    /// Screen enumeration is a main-thread API. Off the main thread this
    /// degrades to the main display alone, derived from CoreGraphics, which
    /// still yields the right scale for the single-display case.
    pub fn screens_snapshot() -> Vec<ScreenFrame> {
        if let Some(mtm) = MainThreadMarker::new() {
            let screens: Vec<ScreenFrame> = NSScreen::screens(mtm)
                .iter()
                .map(|s| {
                    let f = s.frame();
                    ScreenFrame {
                        frame: Rect::new(f.origin.x, f.origin.y, f.size.width, f.size.height),
                        scale: s.backingScaleFactor(),
                    }
                })
                .collect();
            if !screens.is_empty() {
                return screens;
            }
        } else {
            debug!("screens_snapshot: off main thread; using main display only");
        }
        main_display_only()
    }

    fn main_display_only() -> Vec<ScreenFrame> {
        let display = core_graphics::display::CGDisplay::main();
        let bounds = display.bounds();
        let scale = if bounds.size.width > 0.0 {
            display.pixels_wide() as f64 / bounds.size.width
        } else {
            super::DEFAULT_SCALE
        };
        vec![ScreenFrame {
            frame: Rect::new(0.0, 0.0, bounds.size.width, bounds.size.height),
            scale,
        }]
    }
}

#[cfg(target_os = "macos")]
pub use mac::screens_snapshot;

#[cfg(test)]
mod tests {
    use super::*;

    /// Primary Retina laptop screen plus an external 1x display to its right.
    fn two_screens() -> Vec<ScreenFrame> {
        vec![
            ScreenFrame {
                frame: Rect::new(0.0, 0.0, 1512.0, 982.0),
                scale: 2.0,
            },
            ScreenFrame {
                frame: Rect::new(1512.0, -458.0, 1920.0, 1440.0),
                scale: 1.0,
            },
        ]
    }

    #[test]
    fn window_on_primary_uses_primary_scale() {
        let rect = Rect::new(100.0, 100.0, 800.0, 600.0);
        assert_eq!(scale_for_rect(&two_screens(), &rect), 2.0);
    }

    #[test]
    fn window_on_secondary_uses_secondary_scale() {
        // Secondary flips to y = 982 - (-458) - 1440 = 0 in top-left space.
        let rect = Rect::new(2000.0, 300.0, 800.0, 600.0);
        assert_eq!(scale_for_rect(&two_screens(), &rect), 1.0);
    }

    #[test]
    fn center_decides_for_straddling_windows() {
        // Left edge on the primary, center past the seam.
        let rect = Rect::new(1400.0, 200.0, 400.0, 300.0);
        assert_eq!(scale_for_rect(&two_screens(), &rect), 1.0);
    }

    #[test]
    fn offscreen_center_falls_back_to_primary() {
        let rect = Rect::new(-5000.0, -5000.0, 100.0, 100.0);
        assert_eq!(scale_for_rect(&two_screens(), &rect), 2.0);
    }

    #[test]
    fn empty_screen_list_uses_default() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(scale_for_rect(&[], &rect), DEFAULT_SCALE);
    }
}
