//! Layout and pagination engine.
//!
//! Renders a cleaned [`Conversation`] onto a [`Canvas`]: a title band on the
//! first page, then each message as a speaker header followed by its items.
//! A running cursor breaks the page whenever the next block would cross the
//! bottom margin. Overflow pages of a message carry an optional
//! "(continued)" marker instead of a second header.
//!
//! A failure drawing one item is logged, recorded as a warning and replaced
//! by a simpler rendering; only exporting the finished document can fail.
//!
//! # Module Structure
//!
//! - `canvas`: the abstract drawing surface and its value types
//! - `recording`: in-memory display-list canvas
//! - `page`: vertical cursor and page breaks
//! - `text`: headings, list entries, wrapped paragraphs
//! - `code`: code blocks
//! - `blocks`: equation boxes and tables
//! - `images`: image sources, timeouts and placeholders
//!
//! # Example
//!
//! ```rust
//! use rs_chat_export::layout::{render, PreloadedImages, RecordingCanvas};
//! use rs_chat_export::{Conversation, Item, LayoutOptions, Message, Speaker};
//!
//! # tokio_test_block_on(async {
//! let conversation = Conversation {
//!     title: "Demo".to_string(),
//!     messages: vec![Message {
//!         speaker: Speaker::User,
//!         timestamp: "10:00:00".to_string(),
//!         items: vec![Item::text("Hello")],
//!     }],
//! };
//! let layout = LayoutOptions::default();
//! let mut canvas = RecordingCanvas::from_layout(&layout);
//! let doc = render(&mut canvas, &conversation, &layout, &PreloadedImages::new()).await?;
//! assert_eq!(doc.filename, "Demo.json");
//! # Ok::<(), rs_chat_export::Error>(())
//! # }).unwrap();
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod blocks;
pub mod canvas;
pub mod code;
pub mod images;
pub mod page;
pub mod recording;
pub mod text;

use chrono::Local;
use tracing::{debug, info, warn};

pub use canvas::{Canvas, Color, Font, FontFamily, FontStyle, RectStyle, TableSpec};
pub use images::{ImageSource, PreloadedImages};
pub use page::PageCursor;
pub use recording::{DrawOp, RecordingCanvas};

use crate::equation;
use crate::error::{CanvasError, Result};
use crate::options::LayoutOptions;
use crate::result::{Conversation, Item, Message, Speaker};
use text::wrap_text;

/// Speaker header colour for user turns.
pub const USER_COLOR: Color = Color(0, 0, 0);

/// Speaker header colour for assistant turns.
pub const ASSISTANT_COLOR: Color = Color(16, 163, 127);

/// Height of the tinted title band on the first page.
pub const TITLE_BAND_HEIGHT: f64 = 32.0;

/// Vertical position of the rule under the title band.
pub const TITLE_RULE_Y: f64 = 36.0;

const TITLE_BAND_FILL: Color = Color(240, 240, 240);
const TITLE_COLOR: Color = Color(50, 50, 50);
const MUTED: Color = Color(100, 100, 100);
const RULE_COLOR: Color = Color(220, 220, 220);
const CONTINUED_COLOR: Color = Color(150, 150, 150);

/// Longest filename stem produced by [`suggested_filename`].
pub const MAX_FILENAME_LEN: usize = 80;

/// Output of a render run.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Exported document bytes.
    pub bytes: Vec<u8>,
    /// Number of pages.
    pub pages: usize,
    /// Suggested download name, with the canvas's extension.
    pub filename: String,
    /// Items that were drawn with a fallback, one note each.
    pub warnings: Vec<String>,
}

/// Download name for a conversation: letters, digits, `_` and `-` kept,
/// whitespace turned into `_`, capped at 80 characters.
#[must_use]
pub fn suggested_filename(title: &str, extension: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .take(MAX_FILENAME_LEN)
        .collect();
    let stem = if stem.trim_matches('_').is_empty() { "conversation" } else { stem.as_str() };
    format!("{stem}.{extension}")
}

/// Render state for one document.
struct Renderer<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    layout: &'a LayoutOptions,
    images: &'a dyn ImageSource,
    cursor: PageCursor,
    warnings: Vec<String>,
    in_message: bool,
}

impl<'a, C: Canvas + ?Sized> Renderer<'a, C> {
    fn new(canvas: &'a mut C, layout: &'a LayoutOptions, images: &'a dyn ImageSource) -> Self {
        Self {
            canvas,
            layout,
            images,
            cursor: PageCursor::new(layout, layout.first_page_content_top),
            warnings: Vec::new(),
            in_message: false,
        }
    }

    fn note(&mut self, warning: String) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn marker_font(&self) -> Font {
        Font::italic(self.layout.body_font_size * 0.8)
    }

    /// Height the continuation marker takes on an overflow page, zero when
    /// no marker is drawn.
    fn marker_height(&self) -> f64 {
        if self.in_message && self.layout.continuation_marker {
            self.marker_font().line_height(self.layout.line_height_factor)
        } else {
            0.0
        }
    }

    /// Tallest block that fits on an overflow page below the marker.
    fn page_room(&self) -> f64 {
        (self.layout.content_height() - self.marker_height()).max(0.0)
    }

    /// Make room for `height`, breaking the page when needed. An overflow
    /// page inside a message starts with the continuation marker, so a
    /// block no taller than [`Self::page_room`] always ends above the margin.
    fn reserve(&mut self, height: f64) -> std::result::Result<(), CanvasError> {
        let marker_height = self.marker_height();
        if self.cursor.ensure(&mut *self.canvas, height)? && marker_height > 0.0 {
            let font = self.marker_font();
            let line_height = marker_height;
            self.canvas.set_font(font)?;
            self.canvas.set_text_color(CONTINUED_COLOR);
            self.canvas
                .draw_text(&["(continued)".to_string()], self.layout.margin_left, self.cursor.y(), line_height)?;
            self.cursor.advance(line_height);
        }
        Ok(())
    }

    /// Draw wrapped lines at `x`, continuing on new pages as needed.
    fn draw_lines(&mut self, lines: &[String], x: f64, font: Font, color: Color) -> std::result::Result<(), CanvasError> {
        let line_height = font.line_height(self.layout.line_height_factor);
        let mut rest = lines;
        while !rest.is_empty() {
            self.reserve(line_height)?;
            let fit = ((self.cursor.remaining() / line_height).floor() as usize).clamp(1, rest.len());
            let (chunk, tail) = rest.split_at(fit);
            self.canvas.set_font(font)?;
            self.canvas.set_text_color(color);
            self.canvas.draw_text(chunk, x, self.cursor.y(), line_height)?;
            self.cursor.advance(chunk.len() as f64 * line_height);
            rest = tail;
        }
        Ok(())
    }

    /// Title band, export line and separator rule on the first page.
    fn document_header(&mut self, title: &str) -> std::result::Result<(), CanvasError> {
        let layout = self.layout;
        self.canvas.set_fill_color(TITLE_BAND_FILL);
        if let Err(e) = self.canvas.draw_rect(0.0, 0.0, layout.page_width, TITLE_BAND_HEIGHT, RectStyle::Fill) {
            self.note(format!("title band not drawn ({e})"));
        }

        let title_font = Font::bold(layout.title_font_size);
        self.canvas.set_font(title_font)?;
        self.canvas.set_text_color(TITLE_COLOR);
        let lines = wrap_text(&*self.canvas, title, layout.content_width())?;
        if let Some(first) = lines.first() {
            let width = self.canvas.measure_text(first)?;
            let x = (layout.page_width - width) / 2.0;
            self.canvas
                .draw_text(std::slice::from_ref(first), x, 10.0, title_font.line_height(1.0))?;
        }

        let exported = layout
            .exported_at
            .clone()
            .unwrap_or_else(|| Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        let line = format!("Exported on {exported}");
        let info_font = Font::italic(layout.body_font_size);
        self.canvas.set_font(info_font)?;
        self.canvas.set_text_color(MUTED);
        let width = self.canvas.measure_text(&line)?;
        self.canvas
            .draw_text(&[line], (layout.page_width - width) / 2.0, 24.0, info_font.line_height(1.0))?;

        self.canvas.set_draw_color(RULE_COLOR);
        self.canvas
            .draw_line(layout.margin_left, TITLE_RULE_Y, layout.page_width - layout.margin_right, TITLE_RULE_Y)
    }

    /// Speaker label and timestamp, kept on the same page as the first
    /// line of the message body.
    fn message_header(&mut self, message: &Message) -> std::result::Result<(), CanvasError> {
        let layout = self.layout;
        let font = Font::bold(layout.speaker_font_size);
        let line_height = font.line_height(layout.line_height_factor);
        let body_line = Font::helvetica(layout.body_font_size).line_height(layout.line_height_factor);
        self.reserve(line_height + body_line)?;

        let (label, color) = match message.speaker {
            Speaker::User => (&layout.user_label, USER_COLOR),
            Speaker::Assistant => (&layout.assistant_label, ASSISTANT_COLOR),
        };
        let top = self.cursor.y();
        self.canvas.set_font(font)?;
        self.canvas.set_text_color(color);
        self.canvas
            .draw_text(std::slice::from_ref(label), layout.margin_left, top, line_height)?;

        if !message.timestamp.is_empty() {
            let offset = self.canvas.measure_text(label)? + 3.0;
            let small = Font::helvetica(layout.table_font_size);
            self.canvas.set_font(small)?;
            self.canvas.set_text_color(MUTED);
            self.canvas.draw_text(
                std::slice::from_ref(&message.timestamp),
                layout.margin_left + offset,
                top + (line_height - small.line_height(layout.line_height_factor)),
                small.line_height(layout.line_height_factor),
            )?;
        }
        self.cursor.advance(line_height + 1.0);
        Ok(())
    }

    async fn message(&mut self, message: &Message) {
        if let Err(e) = self.message_header(message) {
            self.note(format!("message header not drawn ({e})"));
        }
        self.in_message = true;
        for item in &message.items {
            self.item(item).await;
        }
        self.in_message = false;
        self.cursor.advance(self.layout.message_spacing);
    }

    async fn item(&mut self, item: &Item) {
        let result = match item {
            Item::Text { content, .. } => self.text(content),
            Item::Code { content, .. } => self.code(content),
            Item::Equation { content, .. } => match self.equation(content) {
                Ok(()) => Ok(()),
                Err(e) => {
                    self.note(format!("equation drawn as plain text ({e})"));
                    self.equation_plain(content)
                }
            },
            Item::Table { headers, rows, .. } => self.table(headers, rows),
            Item::Image { content, width, height, .. } => self.image(content, *width, *height).await,
        };
        if let Err(e) = result {
            self.note(format!("{:?} item drawn as plain text ({e})", item.kind()));
            if let Err(e) = self.plain(item) {
                self.note(format!("{:?} item skipped ({e})", item.kind()));
            }
        }
    }

    /// Last-resort rendering: the item's text in the body font.
    fn plain(&mut self, item: &Item) -> std::result::Result<(), CanvasError> {
        let text = match item {
            Item::Text { content, .. } | Item::Code { content, .. } => content.clone(),
            Item::Equation { content, .. } => equation::format(content),
            Item::Table { headers, rows, .. } => std::iter::once(headers.join(" | "))
                .chain(rows.iter().map(|row| row.join(" | ")))
                .collect::<Vec<_>>()
                .join("\n"),
            Item::Image { content, .. } if content.starts_with("data:") => "[Image]".to_string(),
            Item::Image { content, .. } => format!("[Image: {content}]"),
        };
        let font = Font::helvetica(self.layout.body_font_size);
        self.canvas.set_font(font)?;
        let lines = wrap_text(&*self.canvas, &text, self.layout.content_width())?;
        self.draw_lines(&lines, self.layout.margin_left, font, Color::BLACK)?;
        self.cursor.advance(self.layout.item_spacing);
        Ok(())
    }
}

/// Render `conversation` onto `canvas` and export it.
pub async fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    conversation: &Conversation,
    layout: &LayoutOptions,
    images: &dyn ImageSource,
) -> Result<RenderedDocument> {
    let warnings = {
        let mut renderer = Renderer::new(&mut *canvas, layout, images);
        if let Err(e) = renderer.document_header(&conversation.title) {
            renderer.note(format!("document header incomplete ({e})"));
        }
        for (index, message) in conversation.messages.iter().enumerate() {
            debug!(index, items = message.items.len(), "rendering message");
            renderer.message(message).await;
        }
        renderer.warnings
    };

    let bytes = canvas.export_bytes()?;
    let pages = canvas.page_count();
    info!(pages, warnings = warnings.len(), "document rendered");
    Ok(RenderedDocument {
        bytes,
        pages,
        filename: suggested_filename(&conversation.title, canvas.file_extension()),
        warnings,
    })
}
