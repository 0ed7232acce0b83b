//! Code items: monospace text on a tinted block.

use super::canvas::{Canvas, Color, Font, RectStyle};
use super::text::break_word;
use super::Renderer;
use crate::error::CanvasError;
use crate::sanitize::is_control_label;

/// Padding between the tinted block edge and the code text.
pub const CODE_PADDING: f64 = 3.0;

/// Leading lines checked for leaked code-block captions.
pub const MAX_CAPTION_LINES: usize = 2;

const CODE_FILL: Color = Color(245, 245, 245);

/// Code lines with trailing whitespace trimmed, outer blank lines removed,
/// and up to two leading caption lines ("java", "copy edit", "4o") dropped.
#[must_use]
pub fn strip_caption_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.lines().map(|l| l.trim_end().to_string()).collect();
    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    for _ in 0..MAX_CAPTION_LINES {
        if lines.len() > 1 && lines.first().is_some_and(|l| is_control_label(l)) {
            lines.remove(0);
        }
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

impl<C: Canvas + ?Sized> Renderer<'_, C> {
    pub(super) fn code(&mut self, content: &str) -> Result<(), CanvasError> {
        let layout = self.layout;
        let font = Font::mono(layout.code_font_size);
        let line_height = font.line_height(layout.line_height_factor);
        let max_text_width = layout.content_width() - 2.0 * CODE_PADDING;

        self.canvas.set_font(font)?;
        let mut lines = Vec::new();
        for line in strip_caption_lines(content) {
            if self.canvas.measure_text(&line)? <= max_text_width {
                lines.push(line);
            } else {
                lines.extend(break_word(&*self.canvas, &line, max_text_width)?);
            }
        }
        if lines.is_empty() {
            return Ok(());
        }

        let mut rest = lines.as_slice();
        while !rest.is_empty() {
            self.reserve(line_height + 2.0 * CODE_PADDING)?;
            let room = self.cursor.remaining() - 2.0 * CODE_PADDING;
            let fit = ((room / line_height).floor() as usize).clamp(1, rest.len());
            let (chunk, tail) = rest.split_at(fit);

            let mut widest: f64 = 0.0;
            for line in chunk {
                widest = widest.max(self.canvas.measure_text(line)?);
            }
            let block_width = (widest + 2.0 * CODE_PADDING).min(layout.content_width());
            let block_height = chunk.len() as f64 * line_height + 2.0 * CODE_PADDING;
            let top = self.cursor.y();

            self.canvas.set_fill_color(CODE_FILL);
            if let Err(e) = self.canvas.draw_rect(layout.margin_left, top, block_width, block_height, RectStyle::Fill) {
                self.note(format!("code background not drawn: {e}"));
            }
            // the continuation marker may have switched fonts
            self.canvas.set_font(font)?;
            self.canvas.set_text_color(Color::BLACK);
            self.canvas
                .draw_text(chunk, layout.margin_left + CODE_PADDING, top + CODE_PADDING, line_height)?;
            self.cursor.advance(block_height);
            rest = tail;
        }
        self.cursor.advance(layout.item_spacing);
        Ok(())
    }
}
