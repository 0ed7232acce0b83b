//! Abstract document canvas.
//!
//! The layout engine only talks to this surface. Coordinates are in
//! millimetres from the top-left corner of the current page; a text
//! position is the top of its first line.

use serde::Serialize;

use crate::error::CanvasError;

/// Points to millimetres.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// CSS pixels to millimetres at 96 dpi.
pub const PX_TO_MM: f64 = 25.4 / 96.0;

/// Vertical padding inside a table cell.
pub const TABLE_CELL_PADDING: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Helvetica,
    Courier,
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

/// Font selection: family, style and size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: f64,
}

impl Font {
    #[must_use]
    pub fn new(family: FontFamily, style: FontStyle, size: f64) -> Self {
        Self { family, style, size }
    }

    #[must_use]
    pub fn helvetica(size: f64) -> Self {
        Self::new(FontFamily::Helvetica, FontStyle::Normal, size)
    }

    #[must_use]
    pub fn bold(size: f64) -> Self {
        Self::new(FontFamily::Helvetica, FontStyle::Bold, size)
    }

    #[must_use]
    pub fn italic(size: f64) -> Self {
        Self::new(FontFamily::Helvetica, FontStyle::Italic, size)
    }

    #[must_use]
    pub fn mono(size: f64) -> Self {
        Self::new(FontFamily::Courier, FontStyle::Normal, size)
    }

    /// Height of one line in millimetres.
    #[must_use]
    pub fn line_height(&self, factor: f64) -> f64 {
        self.size * PT_TO_MM * factor
    }
}

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RectStyle {
    Fill,
    Stroke,
    FillStroke,
}

/// Grid table handed to the canvas table primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub font_size: f64,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    /// Row height at the table font size.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.font_size * PT_TO_MM * 1.15 + 2.0 * TABLE_CELL_PADDING
    }

    /// Height the grid occupies when every cell fits on one line.
    #[must_use]
    pub fn estimated_height(&self) -> f64 {
        let header_rows = usize::from(!self.headers.is_empty());
        (self.rows.len() + header_rows) as f64 * self.row_height()
    }
}

/// Drawing surface with paged output.
///
/// Style setters never fail. Primitives that may be missing or may fail on
/// a given backend return `CanvasError`, and the layout engine substitutes a
/// simpler rendering for that one item.
pub trait Canvas {
    /// Number of pages, including the current one.
    fn page_count(&self) -> usize;

    /// Start a new page and make it current.
    fn add_page(&mut self) -> Result<(), CanvasError>;

    fn set_font(&mut self, font: Font) -> Result<(), CanvasError>;

    fn set_text_color(&mut self, color: Color);

    fn set_fill_color(&mut self, color: Color);

    fn set_draw_color(&mut self, color: Color);

    /// Draw lines of text with the current font, first line's top at `y`.
    fn draw_text(&mut self, lines: &[String], x: f64, y: f64, line_height: f64) -> Result<(), CanvasError>;

    /// Width of `text` in the current font.
    fn measure_text(&self, text: &str) -> Result<f64, CanvasError>;

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: RectStyle) -> Result<(), CanvasError>;

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), CanvasError>;

    /// Embed encoded image bytes into the given box.
    fn draw_image(&mut self, data: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError>;

    /// Draw a grid table; returns the height used.
    fn draw_table(&mut self, spec: &TableSpec) -> Result<f64, CanvasError>;

    /// Serialized document.
    fn export_bytes(&self) -> Result<Vec<u8>, CanvasError>;

    /// File extension of the exported document, without the dot.
    fn file_extension(&self) -> &'static str;
}
