//! Equation boxes and tables.

use tracing::debug;

use super::canvas::{Canvas, Color, Font, FontFamily, FontStyle, RectStyle, TableSpec};
use super::text::wrap_text;
use super::Renderer;
use crate::equation;
use crate::error::CanvasError;

/// Padding inside an equation box.
pub const EQUATION_PADDING: f64 = 4.0;

const EQUATION_FILL: Color = Color(248, 250, 252);
const EQUATION_BORDER: Color = Color(200, 200, 220);
const EQUATION_TEXT: Color = Color(0, 0, 100);
const FALLBACK_TEXT: Color = Color(100, 100, 100);

/// Cell separator in manually drawn table rows.
const CELL_SEPARATOR: &str = " | ";

impl<C: Canvas + ?Sized> Renderer<'_, C> {
    /// Bordered, centred box holding the display form of the equation.
    pub(super) fn equation(&mut self, content: &str) -> Result<(), CanvasError> {
        let layout = self.layout;
        let text = equation::format(content);
        if text.is_empty() {
            return Ok(());
        }

        let font = Font::new(FontFamily::Times, FontStyle::Italic, layout.equation_font_size);
        let line_height = font.line_height(layout.line_height_factor);
        self.canvas.set_font(font)?;
        let lines = wrap_text(&*self.canvas, &text, layout.content_width() - 2.0 * EQUATION_PADDING)?;
        let mut widths = Vec::with_capacity(lines.len());
        for line in &lines {
            widths.push(self.canvas.measure_text(line)?);
        }
        let widest = widths.iter().copied().fold(0.0, f64::max);
        let box_width = (widest + 2.0 * EQUATION_PADDING).min(layout.content_width());
        let box_height = lines.len() as f64 * line_height + 2.0 * EQUATION_PADDING;
        if box_height > self.page_room() {
            debug!(box_height, "equation taller than a page, drawing lines");
            return self.equation_plain(content);
        }

        self.reserve(box_height)?;
        let top = self.cursor.y();
        let box_x = layout.margin_left + (layout.content_width() - box_width) / 2.0;

        self.canvas.set_fill_color(EQUATION_FILL);
        self.canvas.set_draw_color(EQUATION_BORDER);
        self.canvas.draw_rect(box_x, top, box_width, box_height, RectStyle::FillStroke)?;

        self.canvas.set_font(font)?;
        self.canvas.set_text_color(EQUATION_TEXT);
        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let x = layout.margin_left + (layout.content_width() - width) / 2.0;
            let y = top + EQUATION_PADDING + i as f64 * line_height;
            self.canvas.draw_text(std::slice::from_ref(line), x, y, line_height)?;
        }
        self.cursor.advance(box_height + layout.item_spacing);
        Ok(())
    }

    /// Plain italic rendering used when the boxed form fails.
    pub(super) fn equation_plain(&mut self, content: &str) -> Result<(), CanvasError> {
        let layout = self.layout;
        let font = Font::italic(layout.body_font_size);
        self.canvas.set_font(font)?;
        let lines = wrap_text(&*self.canvas, &equation::format(content), layout.content_width())?;
        self.draw_lines(&lines, layout.margin_left, font, FALLBACK_TEXT)?;
        self.cursor.advance(layout.item_spacing);
        Ok(())
    }

    /// Grid table through the canvas primitive, else manually drawn rows.
    pub(super) fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<(), CanvasError> {
        let layout = self.layout;
        let mut spec = TableSpec {
            x: layout.margin_left,
            y: self.cursor.y(),
            width: layout.content_width(),
            font_size: layout.table_font_size,
            headers: headers.to_vec(),
            rows: rows.to_vec(),
        };

        let height = spec.estimated_height();
        if height > self.page_room() {
            debug!(height, "table taller than a page, drawing rows");
            return self.table_rows(headers, rows);
        }

        self.reserve(height)?;
        spec.y = self.cursor.y();
        match self.canvas.draw_table(&spec) {
            Ok(used) => {
                self.cursor.advance(used + layout.item_spacing);
                Ok(())
            }
            Err(e) => {
                self.note(format!("table primitive failed, drawing rows: {e}"));
                self.table_rows(headers, rows)
            }
        }
    }

    /// Header row in bold, then one line group per body row.
    fn table_rows(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<(), CanvasError> {
        let layout = self.layout;
        let bold = Font::new(FontFamily::Helvetica, FontStyle::Bold, layout.table_font_size);
        let normal = Font::helvetica(layout.table_font_size);

        if !headers.is_empty() {
            self.canvas.set_font(bold)?;
            let lines = wrap_text(&*self.canvas, &headers.join(CELL_SEPARATOR), layout.content_width())?;
            self.draw_lines(&lines, layout.margin_left, bold, Color::BLACK)?;
        }
        for row in rows {
            self.canvas.set_font(normal)?;
            let lines = wrap_text(&*self.canvas, &row.join(CELL_SEPARATOR), layout.content_width())?;
            self.draw_lines(&lines, layout.margin_left, normal, Color::BLACK)?;
        }
        self.cursor.advance(layout.item_spacing);
        Ok(())
    }
}
