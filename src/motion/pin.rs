//! Pinned-section math.
//!
//! A pinned section holds still at the top of the viewport while vertical
//! scroll distance is converted into horizontal travel of its content.  The
//! pin lasts exactly as many scroll units as the content is wider than the
//! viewport, and the page reserves that many rows of spacing after the
//! section so that later sections arrive on time.

/// Geometry of a horizontally scrolling pinned section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Total width of the horizontally scrolling strip.
    pub content_width: f64,
    /// Width of the viewport the strip scrolls through.
    pub viewport_width: f64,
    /// Frames of scroll velocity to look ahead when engaging the pin.
    pub anticipate_frames: f64,
}

impl Pin {
    pub fn new(content_width: f64, viewport_width: f64) -> Self {
        Self {
            content_width,
            viewport_width,
            anticipate_frames: 1.0,
        }
    }

    /// Scroll units the pin lasts; zero when the content fits.
    pub fn distance(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    /// Whether there is anything to pin at all.
    pub fn is_pinnable(&self) -> bool {
        self.distance() > 0.0
    }

    /// Horizontal translation of the content at `progress` (clamped).
    pub fn horizontal_offset(&self, progress: f64) -> f64 {
        if !self.is_pinnable() {
            return 0.0;
        }
        -progress.clamp(0.0, 1.0) * self.distance()
    }

    /// Whether the section should be held at the viewport top.  Forward
    /// motion engages the pin up to `anticipate_frames` early so the section
    /// never visibly overshoots before snapping back.
    pub fn engaged(&self, offset: f64, velocity: f64, start: f64) -> bool {
        if !self.is_pinnable() {
            return false;
        }
        let lookahead = offset + velocity.max(0.0) * self.anticipate_frames;
        lookahead >= start && offset <= start + self.distance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_progress_translates_half_the_overflow() {
        let pin = Pin::new(2000.0, 800.0);
        assert_eq!(pin.distance(), 1200.0);
        assert_eq!(pin.horizontal_offset(0.5), -600.0);
        assert_eq!(pin.horizontal_offset(0.0), 0.0);
        assert_eq!(pin.horizontal_offset(1.0), -1200.0);
        assert_eq!(pin.horizontal_offset(3.0), -1200.0);
    }

    #[test]
    fn content_that_fits_never_pins() {
        for width in [0.0, 400.0, 800.0] {
            let pin = Pin::new(width, 800.0);
            assert_eq!(pin.distance(), 0.0);
            assert!(!pin.engaged(100.0, 5.0, 100.0));
            assert_eq!(pin.horizontal_offset(0.5), 0.0);
        }
    }

    #[test]
    fn anticipates_one_frame_of_forward_motion() {
        let pin = Pin::new(200.0, 80.0);
        // Three rows short of the start, moving four rows per frame.
        assert!(pin.engaged(97.0, 4.0, 100.0));
        assert!(!pin.engaged(97.0, 2.0, 100.0));
        // Moving backwards never anticipates.
        assert!(!pin.engaged(97.0, -4.0, 100.0));
        assert!(pin.engaged(220.0, 0.0, 100.0));
        assert!(!pin.engaged(221.0, 0.0, 100.0));
    }
}
