//! Text items: headings, list entries and wrapped paragraphs.

use super::canvas::{Canvas, Color, Font};
use super::Renderer;
use crate::cleanup::rules::is_heading;
use crate::error::CanvasError;
use crate::patterns::{BULLET_MARKER, NUMBERED_MARKER};

/// Horizontal indent per list nesting level, in millimetres.
pub const LIST_INDENT: f64 = 5.0;

/// Deepest list nesting that gets its own indent.
pub const MAX_LIST_DEPTH: usize = 3;

const HEADING_COLOR: Color = Color(35, 35, 35);
const BODY_COLOR: Color = Color(50, 50, 50);

/// How a text item is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextShape {
    Heading,
    /// List entry; `display` has the marker followed by one space.
    ListItem { depth: usize, display: String },
    Paragraph,
}

/// Shape of a text item. Nesting is read from the spaces after the list
/// marker, two per level.
#[must_use]
pub fn text_shape(content: &str) -> TextShape {
    let trimmed = content.trim();
    for marker in [&*BULLET_MARKER, &*NUMBERED_MARKER] {
        if let Some(caps) = marker.captures(trimmed) {
            let extra = caps.get(1).map_or(0, |m| m.as_str().len());
            let depth = (1 + extra / 2).min(MAX_LIST_DEPTH);
            let marker_text = caps.get(0).map_or("", |m| m.as_str()).trim_end();
            let rest = trimmed[caps.get(0).map_or(0, |m| m.end())..].trim_start();
            return TextShape::ListItem { depth, display: format!("{marker_text} {rest}") };
        }
    }
    if is_heading(trimmed) {
        TextShape::Heading
    } else {
        TextShape::Paragraph
    }
}

/// Greedy word wrap to `max_width` in the canvas's current font. Words
/// wider than a line are broken between characters. Newlines force breaks.
pub fn wrap_text<C: Canvas + ?Sized>(canvas: &C, text: &str, max_width: f64) -> Result<Vec<String>, CanvasError> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() { word.to_string() } else { format!("{current} {word}") };
            if canvas.measure_text(&candidate)? <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if canvas.measure_text(word)? <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(canvas, word, max_width)?;
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        lines.push(current);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}

/// Split a string into pieces no wider than `max_width`, keeping at least one
/// character per piece.
pub fn break_word<C: Canvas + ?Sized>(canvas: &C, word: &str, max_width: f64) -> Result<Vec<String>, CanvasError> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && canvas.measure_text(&current)? > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    Ok(pieces)
}

impl<C: Canvas + ?Sized> Renderer<'_, C> {
    pub(super) fn text(&mut self, content: &str) -> Result<(), CanvasError> {
        let layout = self.layout;
        let body = Font::helvetica(layout.body_font_size);

        match text_shape(content) {
            TextShape::Heading => {
                let font = Font::bold(layout.heading_font_size);
                let line_height = font.line_height(layout.line_height_factor);
                self.canvas.set_font(font)?;
                let lines = wrap_text(&*self.canvas, content.trim(), layout.content_width())?;
                // keep a heading together with the first line below it
                self.reserve(line_height + body.line_height(layout.line_height_factor))?;
                self.draw_lines(&lines, layout.margin_left, font, HEADING_COLOR)?;
                self.cursor.advance(layout.item_spacing * 0.5);
            }
            TextShape::ListItem { depth, display } => {
                let indent = depth as f64 * LIST_INDENT;
                self.canvas.set_font(body)?;
                let lines = wrap_text(&*self.canvas, &display, layout.content_width() - indent)?;
                self.draw_lines(&lines, layout.margin_left + indent, body, BODY_COLOR)?;
                self.cursor.advance(layout.item_spacing * 0.5);
            }
            TextShape::Paragraph => {
                self.canvas.set_font(body)?;
                let lines = wrap_text(&*self.canvas, content.trim(), layout.content_width())?;
                self.draw_lines(&lines, layout.margin_left, body, BODY_COLOR)?;
                self.cursor.advance(layout.item_spacing);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RecordingCanvas;

    #[test]
    fn test_text_shapes() {
        assert_eq!(text_shape("Steps:"), TextShape::Heading);
        assert_eq!(text_shape("Plain sentence that keeps going on."), TextShape::Paragraph);
        assert_eq!(text_shape("Heating the pan slowly keeps it even."), TextShape::Paragraph);
        assert_eq!(
            text_shape("• top"),
            TextShape::ListItem { depth: 1, display: "• top".to_string() }
        );
        assert_eq!(
            text_shape("•   inner"),
            TextShape::ListItem { depth: 2, display: "• inner".to_string() }
        );
        assert_eq!(
            text_shape("3. third"),
            TextShape::ListItem { depth: 1, display: "3. third".to_string() }
        );
        assert!(matches!(text_shape("•           deep"), TextShape::ListItem { depth: 3, .. }));
    }

    #[test]
    fn test_wrap_respects_width() {
        let canvas = RecordingCanvas::new(210.0, 297.0);
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let lines = wrap_text(&canvas, &text, 50.0).unwrap();

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(canvas.measure_text(line).unwrap() <= 50.0);
        }
        assert_eq!(lines.join(" "), text.trim());
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let canvas = RecordingCanvas::new(210.0, 297.0);
        let word = "x".repeat(200);
        let lines = wrap_text(&canvas, &word, 30.0).unwrap();
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty() {
        let canvas = RecordingCanvas::new(210.0, 297.0);
        assert!(wrap_text(&canvas, "   ", 30.0).unwrap().is_empty());
    }
}
