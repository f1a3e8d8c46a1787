//! Scroll state of the display. The host presents the actual scrollbars; this module only
//! keeps their ranges, page steps and values consistent with the content and viewport size.

use crate::coords::CellMetrics;
use tracing::trace;

/// Pointer drag progress of the primary selection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No button held
    #[default]
    Idle,
    /// Button pressed on a byte, not moved yet
    PointPlaced,
    /// Button held and moved, selection is growing
    Extending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Viewport size in pixels
    width: f32,
    height: f32,
    visible_columns: usize,
    visible_lines: usize,
    /// Horizontal scroll in character cells, `0..=h_max`
    h_value: usize,
    h_max: usize,
    /// Vertical scroll in lines, `0..=v_max`
    v_value: usize,
    v_max: usize,
    /// Rows kept between the cursor and the edges
    scroll_margin: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new(scroll_margin: usize) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            visible_columns: 0,
            visible_lines: 0,
            h_value: 0,
            h_max: 0,
            v_value: 0,
            v_max: 0,
            scroll_margin,
        }
    }

    /// Update the pixel size and the number of (partially) visible cells
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, width: f32, height: f32, metrics: CellMetrics) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.visible_columns = (self.width / metrics.width).ceil() as usize;
        self.visible_lines = (self.height / metrics.height).ceil() as usize;
    }

    /// Recompute the scroll ranges for the content size and clamp the values into them
    pub fn adjust(&mut self, num_lines: usize, total_chars_per_line: usize) {
        self.h_max = (total_chars_per_line + 1).saturating_sub(self.visible_columns);
        self.v_max = (num_lines + 1).saturating_sub(self.visible_lines);
        self.h_value = self.h_value.min(self.h_max);
        self.v_value = self.v_value.min(self.v_max);
    }

    #[must_use]
    pub const fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn visible_columns(&self) -> usize {
        self.visible_columns
    }

    #[must_use]
    pub const fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    #[must_use]
    pub const fn horizontal(&self) -> usize {
        self.h_value
    }

    #[must_use]
    pub const fn horizontal_max(&self) -> usize {
        self.h_max
    }

    /// Horizontal page step
    #[must_use]
    pub const fn horizontal_page(&self) -> usize {
        self.visible_columns
    }

    #[must_use]
    pub const fn vertical(&self) -> usize {
        self.v_value
    }

    #[must_use]
    pub const fn vertical_max(&self) -> usize {
        self.v_max
    }

    /// Vertical page step
    #[must_use]
    pub const fn vertical_page(&self) -> usize {
        self.visible_lines
    }

    /// Index shown at the start of the first visible line
    #[must_use]
    pub const fn first_visible_index(&self, bytes_per_line: usize) -> usize {
        self.v_value * bytes_per_line
    }

    /// Returns `true` if the value changed
    pub fn set_vertical(&mut self, value: usize) -> bool {
        let value = value.min(self.v_max);
        let changed = value != self.v_value;
        self.v_value = value;
        if changed {
            trace!(line = value, "vertical scroll");
        }
        changed
    }

    /// Returns `true` if the value changed
    pub fn set_horizontal(&mut self, value: usize) -> bool {
        let value = value.min(self.h_max);
        let changed = value != self.h_value;
        self.h_value = value;
        changed
    }

    /// Scroll by `delta` lines (negative scrolls up)
    pub fn scroll_lines(&mut self, delta: i64) -> bool {
        let magnitude = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let target = if delta < 0 {
            self.v_value.saturating_sub(magnitude)
        } else {
            self.v_value.saturating_add(magnitude)
        };
        self.set_vertical(target)
    }

    /// Scroll so that a row (relative to the first visible line) stays at least
    /// `scroll_margin` rows away from the top and bottom edges.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn follow_row(&mut self, row: i64) -> bool {
        if self.visible_lines == 0 {
            return false;
        }
        let visible = self.visible_lines as i64;
        let margin = self.scroll_margin as i64;

        let delta = if row > visible - margin {
            row - visible + margin
        } else if row < margin {
            row - margin
        } else {
            0
        };
        if delta == 0 {
            return false;
        }

        let target = (self.v_value as i64 + delta).max(0);
        self.set_vertical(target as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn viewport(lines: usize, num_lines: usize) -> Viewport {
        let metrics = CellMetrics {
            width: 8.0,
            height: 16.0,
        };
        let mut vp = Viewport::new(4);
        vp.resize(800.0, lines as f32 * 16.0, metrics);
        vp.adjust(num_lines, 149);
        vp
    }

    #[test]
    fn test_ranges_from_content() {
        // Arrange
        let vp = viewport(20, 100);

        // Act & Assert
        assert_eq!(vp.visible_lines(), 20);
        assert_eq!(vp.vertical_max(), 81);
        assert_eq!(vp.vertical_page(), 20);
        assert_eq!(vp.visible_columns(), 100);
        assert_eq!(vp.horizontal_max(), 50);
    }

    #[test]
    fn test_partial_line_counts_as_visible() {
        // Arrange
        let mut vp = Viewport::new(4);

        // Act
        vp.resize(10.0, 33.0, CellMetrics::default());

        // Assert
        assert_eq!(vp.visible_lines(), 3);
        assert_eq!(vp.visible_columns(), 2);
    }

    #[test]
    fn test_small_content_has_no_range() {
        // Arrange
        let mut vp = viewport(20, 5);

        // Act
        let changed = vp.set_vertical(10);

        // Assert
        assert_eq!(vp.vertical_max(), 0);
        assert!(!changed);
    }

    #[test]
    fn test_follow_row_near_bottom() {
        // Arrange
        let mut vp = viewport(20, 100);

        // Act
        let changed = vp.follow_row(18);

        // Assert
        assert!(changed);
        assert_eq!(vp.vertical(), 2);
    }

    #[test]
    fn test_follow_row_near_top() {
        // Arrange
        let mut vp = viewport(20, 100);
        vp.set_vertical(10);

        // Act
        vp.follow_row(1);

        // Assert
        assert_eq!(vp.vertical(), 7);
    }

    #[test]
    fn test_follow_row_top_clamps_at_zero() {
        // Arrange
        let mut vp = viewport(20, 100);

        // Act
        let changed = vp.follow_row(0);

        // Assert
        assert!(!changed);
        assert_eq!(vp.vertical(), 0);
    }

    #[test]
    fn test_follow_row_inside_comfort_zone() {
        // Arrange
        let mut vp = viewport(20, 100);
        vp.set_vertical(3);

        // Act
        let changed = vp.follow_row(16);

        // Assert
        assert!(!changed);
        assert_eq!(vp.vertical(), 3);
    }

    #[test]
    fn test_scroll_lines_clamped() {
        // Arrange
        let mut vp = viewport(20, 30);

        // Act
        vp.scroll_lines(-3);
        let top = vp.vertical();
        vp.scroll_lines(1000);

        // Assert
        assert_eq!(top, 0);
        assert_eq!(vp.vertical(), vp.vertical_max());
    }

    #[test]
    fn test_adjust_clamps_current_value() {
        // Arrange
        let mut vp = viewport(20, 100);
        vp.set_vertical(80);

        // Act
        vp.adjust(40, 149);

        // Assert
        assert_eq!(vp.vertical(), 21);
    }
}
