//! In-memory canvas that records a display list per page.
//!
//! Font metrics are approximated from average glyph widths. The recorder can
//! be built without the table primitive or with failing rectangle draws so
//! the layout fallbacks can be exercised.

use serde::Serialize;

use super::canvas::{Canvas, Color, Font, FontFamily, FontStyle, RectStyle, TableSpec, PT_TO_MM};
use crate::error::CanvasError;
use crate::options::LayoutOptions;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    Text {
        lines: Vec<String>,
        x: f64,
        y: f64,
        line_height: f64,
        font: Font,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
        fill: Color,
        stroke: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        bytes: usize,
    },
    Table(TableSpec),
}

impl DrawOp {
    /// Top edge of the operation on its page.
    #[must_use]
    pub fn top(&self) -> f64 {
        match self {
            Self::Text { y, .. } | Self::Rect { y, .. } | Self::Image { y, .. } => *y,
            Self::Line { y1, y2, .. } => y1.min(*y2),
            Self::Table(spec) => spec.y,
        }
    }

    /// Bottom edge of the operation on its page.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        match self {
            Self::Text { lines, y, line_height, .. } => y + lines.len() as f64 * line_height,
            Self::Rect { y, height, .. } | Self::Image { y, height, .. } => y + height,
            Self::Line { y1, y2, .. } => y1.max(*y2),
            Self::Table(spec) => spec.y + spec.estimated_height(),
        }
    }
}

/// Display-list canvas.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    page_width: f64,
    page_height: f64,
    pages: Vec<Vec<DrawOp>>,
    font: Font,
    text_color: Color,
    fill_color: Color,
    draw_color: Color,
    supports_tables: bool,
    fail_rects: bool,
}

impl RecordingCanvas {
    /// Empty canvas with one page of the given size.
    #[must_use]
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            pages: vec![Vec::new()],
            font: Font::helvetica(10.0),
            text_color: Color::BLACK,
            fill_color: Color::WHITE,
            draw_color: Color::BLACK,
            supports_tables: true,
            fail_rects: false,
        }
    }

    #[must_use]
    pub fn from_layout(layout: &LayoutOptions) -> Self {
        Self::new(layout.page_width, layout.page_height)
    }

    /// Canvas without the grid-table primitive.
    #[must_use]
    pub fn without_tables(mut self) -> Self {
        self.supports_tables = false;
        self
    }

    /// Canvas whose rectangle primitive always fails.
    #[must_use]
    pub fn with_failing_rects(mut self) -> Self {
        self.fail_rects = true;
        self
    }

    #[must_use]
    pub fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    #[must_use]
    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Every operation with its zero-based page index.
    pub fn ops(&self) -> impl Iterator<Item = (usize, &DrawOp)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, ops)| ops.iter().map(move |op| (page, op)))
    }

    /// Every drawn text line, in drawing order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.ops()
            .filter_map(|(_, op)| match op {
                DrawOp::Text { lines, .. } => Some(lines.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Tables drawn through the table primitive.
    #[must_use]
    pub fn tables(&self) -> Vec<&TableSpec> {
        self.ops()
            .filter_map(|(_, op)| match op {
                DrawOp::Table(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    fn glyph_width(font: &Font) -> f64 {
        let em = font.size * PT_TO_MM;
        let average = match font.family {
            FontFamily::Courier => 0.6,
            FontFamily::Helvetica => 0.5,
            FontFamily::Times => 0.45,
        };
        let weight = if font.style == FontStyle::Bold { 1.05 } else { 1.0 };
        em * average * weight
    }
}

impl Canvas for RecordingCanvas {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn set_font(&mut self, font: Font) -> Result<(), CanvasError> {
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(CanvasError::Font(format!("invalid font size {}", font.size)));
        }
        self.font = font;
        Ok(())
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn draw_text(&mut self, lines: &[String], x: f64, y: f64, line_height: f64) -> Result<(), CanvasError> {
        if lines.is_empty() {
            return Ok(());
        }
        self.push(DrawOp::Text {
            lines: lines.to_vec(),
            x,
            y,
            line_height,
            font: self.font,
            color: self.text_color,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str) -> Result<f64, CanvasError> {
        Ok(text.chars().count() as f64 * Self::glyph_width(&self.font))
    }

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: RectStyle) -> Result<(), CanvasError> {
        if self.fail_rects {
            return Err(CanvasError::Draw("rectangle primitive failed".to_string()));
        }
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            style,
            fill: self.fill_color,
            stroke: self.draw_color,
        });
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), CanvasError> {
        self.push(DrawOp::Line { x1, y1, x2, y2, color: self.draw_color });
        Ok(())
    }

    fn draw_image(&mut self, data: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        if data.is_empty() {
            return Err(CanvasError::Draw("empty image data".to_string()));
        }
        self.push(DrawOp::Image { x, y, width, height, bytes: data.len() });
        Ok(())
    }

    fn draw_table(&mut self, spec: &TableSpec) -> Result<f64, CanvasError> {
        if !self.supports_tables {
            return Err(CanvasError::Unsupported("grid table"));
        }
        let height = spec.estimated_height();
        self.push(DrawOp::Table(spec.clone()));
        Ok(height)
    }

    fn export_bytes(&self) -> Result<Vec<u8>, CanvasError> {
        serde_json::to_vec(&self.pages).map_err(|e| CanvasError::Export(e.to_string()))
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_per_page() {
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        canvas.draw_text(&["one".to_string()], 20.0, 20.0, 5.0).unwrap();
        canvas.add_page().unwrap();
        canvas.draw_text(&["two".to_string(), "three".to_string()], 20.0, 20.0, 5.0).unwrap();

        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.texts(), vec!["one", "two", "three"]);
        assert_eq!(canvas.pages()[1][0].bottom(), 30.0);
    }

    #[test]
    fn test_mono_wider_than_proportional() {
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        let proportional = canvas.measure_text("abc").unwrap();
        canvas.set_font(Font::mono(10.0)).unwrap();
        assert!(canvas.measure_text("abc").unwrap() > proportional);
    }

    #[test]
    fn test_invalid_font_rejected() {
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        assert!(matches!(canvas.set_font(Font::helvetica(0.0)), Err(CanvasError::Font(_))));
    }

    #[test]
    fn test_fallback_switches() {
        let mut canvas = RecordingCanvas::new(210.0, 297.0).without_tables().with_failing_rects();
        let spec = TableSpec {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            font_size: 8.0,
            headers: Vec::new(),
            rows: Vec::new(),
        };
        assert_eq!(canvas.draw_table(&spec), Err(CanvasError::Unsupported("grid table")));
        assert!(canvas.draw_rect(0.0, 0.0, 1.0, 1.0, RectStyle::Fill).is_err());
    }

    #[test]
    fn test_export_is_json_display_list() {
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        canvas.draw_line(0.0, 1.0, 10.0, 1.0).unwrap();
        let bytes = canvas.export_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0][0]["op"], "line");
        assert_eq!(canvas.file_extension(), "json");
    }
}
