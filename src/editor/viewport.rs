//! Scroll position of the source surface.
//!
//! The [`Viewport`] tracks which lines and columns of the buffer are
//! visible. Offsets are always kept within the content bounds.

use std::ops::Range;

/// Manages the visible portion of an editor buffer.
///
/// # Example
///
/// ```
/// use markdual::editor::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    top: usize,
    left: usize,
    total_lines: usize,
}

/// A captured scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
    /// First visible line
    pub top: usize,
    /// First visible column
    pub left: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Visible columns
    /// * `height` - Visible lines
    /// * `total_lines` - Total lines in the buffer
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            top: 0,
            left: 0,
            total_lines,
        }
    }

    /// Index of the first visible line.
    pub const fn offset(&self) -> usize {
        self.top
    }

    /// Index of the first visible column.
    pub const fn left(&self) -> usize {
        self.left
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Range of visible lines, clamped to the buffer.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.top;
        let end = (self.top + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll up by n lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.top = self.top.saturating_sub(n);
    }

    /// Scroll down by n lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.top = (self.top + n).min(self.max_offset());
    }

    /// Scroll left by n columns.
    pub const fn scroll_left(&mut self, n: usize) {
        self.left = self.left.saturating_sub(n);
    }

    /// Scroll right by n columns.
    pub const fn scroll_right(&mut self, n: usize) {
        self.left = self.left.saturating_add(n);
    }

    pub const fn position(&self) -> ScrollPosition {
        ScrollPosition {
            top: self.top,
            left: self.left,
        }
    }

    /// Return to a captured position. The line offset is clamped only if
    /// the buffer has become too short for it.
    pub fn restore(&mut self, position: ScrollPosition) {
        self.top = position.top.min(self.max_offset());
        self.left = position.left;
    }

    /// Scroll the minimum amount needed to show `line`/`col`.
    pub const fn ensure_visible(&mut self, line: usize, col: usize) {
        let height = self.height as usize;
        if height == 0 {
            self.top = line;
        } else if line < self.top {
            self.top = line;
        } else if line >= self.top + height {
            self.top = line + 1 - height;
        }

        let width = self.width as usize;
        if width == 0 {
            self.left = col;
        } else if col < self.left {
            self.left = col;
        } else if col >= self.left + width {
            self.left = col + 1 - width;
        }
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.top = self.top.min(self.max_offset());
    }

    /// Update the total number of lines (e.g., after a replace).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.top = self.top.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.position(), ScrollPosition::default());
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_visible_range_with_short_buffer() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_restore_is_exact_when_in_bounds() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(42);
        vp.scroll_right(7);
        let pos = vp.position();
        vp.scroll_up(42);
        vp.scroll_left(7);
        vp.restore(pos);
        assert_eq!(vp.position(), ScrollPosition { top: 42, left: 7 });
    }

    #[test]
    fn test_restore_clamps_when_buffer_shrank() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(80);
        let pos = vp.position();
        vp.set_total_lines(20);
        vp.restore(pos);
        assert_eq!(vp.offset(), 10);
    }

    #[test]
    fn test_set_total_lines_adjusts_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(80);
        vp.set_total_lines(50);
        assert_eq!(vp.offset(), 26);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_minimally() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.ensure_visible(15, 0);
        assert_eq!(vp.offset(), 6);
    }

    #[test]
    fn test_ensure_visible_scrolls_up_to_line() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(50);
        vp.ensure_visible(3, 0);
        assert_eq!(vp.offset(), 3);
    }

    #[test]
    fn test_ensure_visible_scrolls_horizontally() {
        let mut vp = Viewport::new(20, 10, 100);
        vp.ensure_visible(0, 30);
        assert_eq!(vp.left(), 11);
        vp.ensure_visible(0, 2);
        assert_eq!(vp.left(), 2);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scroll_never_exceeds_bounds(
                total_lines in 1..10000usize,
                height in 1..100u16,
                scroll_amount in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(scroll_amount);

                let max = total_lines.saturating_sub(height as usize);
                prop_assert!(vp.offset() <= max);
            }

            #[test]
            fn restore_after_shrink_stays_in_bounds(
                total_lines in 1..10000usize,
                new_total in 0..10000usize,
                height in 1..100u16,
                offset in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(offset);
                let pos = vp.position();
                vp.set_total_lines(new_total);
                vp.restore(pos);

                prop_assert!(vp.offset() <= new_total.saturating_sub(height as usize));
            }
        }
    }
}
