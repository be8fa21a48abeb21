//! Geometry primitives shared across the workspace.
//!
//! All rectangles here use a top-left origin (y grows downward), matching
//! CGWindowList bounds. The capture crate handles the flip against
//! bottom-left-origin NSScreen frames.

/// Axis-aligned rectangle with f64 fields for CoreGraphics interop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge (top-left origin).
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle.
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Horizontal center.
    #[inline]
    #[must_use]
    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    #[inline]
    #[must_use]
    pub fn cy(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// True when the point lies inside (edges inclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_containment() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.cx(), 60.0);
        assert_eq!(r.cy(), 45.0);
        assert!(r.contains(60.0, 45.0));
        assert!(r.contains(10.0, 20.0));
        assert!(!r.contains(9.0, 45.0));
        assert!(!r.contains(60.0, 71.0));
    }
}
