// Interactive view state: pan/zoom and the pie row cursor

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;

/// Pan/zoom applied to chart coordinates.
/// Scale stretches the horizontal extent of line and bar charts; offsets
/// shift every chart coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Apply one wheel delta; deltas accumulate and the result is clamped.
    pub fn zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Apply one drag delta in pixels
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.offset_x += dx;
        }
        if dy.is_finite() {
            self.offset_y += dy;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scale with the clamp re-applied, for transforms built by hand
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_finite() {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        }
    }
}

/// Which row the pie chart shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieCursor {
    index: usize,
}

impl PieCursor {
    /// Current row for a dataset of `len` rows
    pub fn current(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.index % len)
        }
    }

    /// Advance to the next row, wrapping modulo `len`
    pub fn next(&mut self, len: usize) -> usize {
        self.index = if len == 0 { 0 } else { (self.index + 1) % len };
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_in_never_exceeds_max() {
        let mut view = ViewTransform::default();
        for _ in 0..100 {
            view.zoom(0.25);
        }
        assert_eq!(view.scale, MAX_SCALE);
    }

    #[test]
    fn test_zoom_out_never_below_min() {
        let mut view = ViewTransform::default();
        for _ in 0..100 {
            view.zoom(-0.1);
        }
        assert_eq!(view.scale, MIN_SCALE);
    }

    #[test]
    fn test_zoom_accumulates() {
        let mut view = ViewTransform::default();
        view.zoom(0.5);
        view.zoom(0.25);
        assert!((view.scale - 1.75).abs() < 1e-12);
        view.zoom(f64::NAN);
        assert!((view.scale - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut view = ViewTransform::default();
        view.pan(10.0, -5.0);
        view.pan(2.0, 1.0);
        assert_eq!((view.offset_x, view.offset_y), (12.0, -4.0));
        view.reset();
        assert_eq!(view, ViewTransform::default());
    }

    #[test]
    fn test_effective_scale_clamps_manual_values() {
        let view = ViewTransform { scale: 40.0, ..Default::default() };
        assert_eq!(view.effective_scale(), MAX_SCALE);
        let view = ViewTransform { scale: f64::NAN, ..Default::default() };
        assert_eq!(view.effective_scale(), 1.0);
    }

    #[test]
    fn test_pie_cursor_wraps() {
        let mut cursor = PieCursor::default();
        assert_eq!(cursor.next(3), 1);
        assert_eq!(cursor.next(3), 2);
        assert_eq!(cursor.next(3), 0);
        assert_eq!(cursor.next(0), 0);
        assert_eq!(cursor.current(0), None);
    }

    #[test]
    fn test_pie_cursor_current_after_shrink() {
        let mut cursor = PieCursor::default();
        cursor.next(5);
        cursor.next(5);
        cursor.next(5);
        assert_eq!(cursor.current(2), Some(1));
    }
}
