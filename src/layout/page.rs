//! Vertical cursor with page-break logic.

use tracing::debug;

use super::canvas::Canvas;
use crate::error::CanvasError;
use crate::options::LayoutOptions;

/// Running vertical position on the current page.
///
/// Continuation pages start at the top margin. Nothing is placed whose top
/// lies below `page_height - margin_bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    y: f64,
    top: f64,
    bottom: f64,
}

impl PageCursor {
    #[must_use]
    pub fn new(layout: &LayoutOptions, start: f64) -> Self {
        let top = layout.margin_top;
        let bottom = layout.content_bottom().max(top);
        Self { y: start.clamp(top, bottom), top, bottom }
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Space left on the current page.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.bottom - self.y).max(0.0)
    }

    /// Whether the cursor sits at the top of a fresh page.
    #[must_use]
    pub fn at_page_top(&self) -> bool {
        self.y <= self.top
    }

    #[must_use]
    pub fn fits(&self, height: f64) -> bool {
        self.y + height <= self.bottom
    }

    pub fn advance(&mut self, by: f64) {
        self.y += by.max(0.0);
    }

    /// Start a new page and move to its top margin.
    pub fn new_page<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<(), CanvasError> {
        canvas.add_page()?;
        self.y = self.top;
        debug!(page = canvas.page_count(), "page break");
        Ok(())
    }

    /// Break the page when `height` does not fit below the cursor. Returns
    /// whether a new page was started. On a fresh page nothing more can be
    /// gained, so the item is placed at the top and may overflow.
    pub fn ensure<C: Canvas + ?Sized>(&mut self, canvas: &mut C, height: f64) -> Result<bool, CanvasError> {
        if self.fits(height) || self.at_page_top() {
            return Ok(false);
        }
        self.new_page(canvas)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RecordingCanvas;

    fn layout() -> LayoutOptions {
        LayoutOptions { page_height: 100.0, margin_top: 10.0, margin_bottom: 10.0, ..LayoutOptions::default() }
    }

    #[test]
    fn test_break_when_item_overflows() {
        let mut canvas = RecordingCanvas::new(210.0, 100.0);
        let mut cursor = PageCursor::new(&layout(), 50.0);

        assert!(!cursor.ensure(&mut canvas, 40.0).unwrap());
        cursor.advance(35.0);
        assert!(cursor.ensure(&mut canvas, 10.0).unwrap());
        assert_eq!(cursor.y(), 10.0);
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_oversized_item_at_top_does_not_loop() {
        let mut canvas = RecordingCanvas::new(210.0, 100.0);
        let mut cursor = PageCursor::new(&layout(), 10.0);
        assert!(!cursor.ensure(&mut canvas, 500.0).unwrap());
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_start_clamped_into_content_area() {
        let cursor = PageCursor::new(&layout(), 150.0);
        assert_eq!(cursor.y(), 90.0);
        assert_eq!(cursor.remaining(), 0.0);
    }
}
