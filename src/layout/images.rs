//! Image loading and embedding.
//!
//! Loads go through an [`ImageSource`] under a timeout. Anything that does
//! not yield decodable bytes in time becomes a placeholder box carrying the
//! source URL.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;
use url::Url;

use super::canvas::{Canvas, Color, Font, RectStyle, PX_TO_MM};
use super::text::wrap_text;
use super::Renderer;
use crate::error::{CanvasError, ImageError};

/// Share of the content height an image may take.
pub const MAX_IMAGE_HEIGHT_SHARE: f64 = 0.5;

/// Width share used when no dimensions are known (drawn at 4:3).
pub const DEFAULT_IMAGE_WIDTH_SHARE: f64 = 0.6;

const PLACEHOLDER_FILL: Color = Color(230, 240, 250);
const PLACEHOLDER_BORDER: Color = Color(180, 200, 230);
const PLACEHOLDER_LABEL: Color = Color(50, 50, 150);
const PLACEHOLDER_URL: Color = Color(100, 100, 100);
const PLACEHOLDER_PADDING: f64 = 4.0;

/// Source of already-loaded image bytes.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Encoded bytes for `src`.
    async fn load(&self, src: &str) -> Result<Vec<u8>, ImageError>;
}

/// Images available without fetching: data URLs plus bytes registered by
/// the caller. Remote sources that were not registered are reported as
/// cross-origin.
#[derive(Debug, Clone, Default)]
pub struct PreloadedImages {
    images: HashMap<String, Vec<u8>>,
}

impl PreloadedImages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(src.into(), bytes);
    }

    #[must_use]
    pub fn with(mut self, src: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(src, bytes);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait]
impl ImageSource for PreloadedImages {
    async fn load(&self, src: &str) -> Result<Vec<u8>, ImageError> {
        if src.starts_with("data:") {
            return decode_data_url(src);
        }
        if let Some(bytes) = self.images.get(src) {
            return Ok(bytes.clone());
        }
        match Url::parse(src) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Err(ImageError::CrossOrigin(src.to_string())),
            _ => Err(ImageError::NotFound(src.to_string())),
        }
    }
}

/// Payload of a `data:` URL.
pub fn decode_data_url(src: &str) -> Result<Vec<u8>, ImageError> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::Decode("not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::Decode("data URL has no payload".to_string()))?;
    if header.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::Decode(e.to_string()))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Load through `source`, giving up after `timeout`.
pub async fn load_image(source: &dyn ImageSource, src: &str, timeout: Duration) -> Result<Vec<u8>, ImageError> {
    match tokio::time::timeout(timeout, source.load(src)).await {
        Ok(result) => result,
        Err(_) => Err(ImageError::Timeout(timeout)),
    }
}

/// Pixel size from the encoded header, if the format is recognised.
#[must_use]
pub fn pixel_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Drawn size in millimetres for an image of `pixels`, scaled down to fit
/// `max_width` x `max_height`. Unknown sizes are drawn at 4:3.
#[must_use]
pub fn display_size(pixels: Option<(f64, f64)>, max_width: f64, max_height: f64) -> (f64, f64) {
    let (width, height) = match pixels {
        Some((w, h)) if w > 0.0 && h > 0.0 => (w * PX_TO_MM, h * PX_TO_MM),
        _ => {
            let w = max_width * DEFAULT_IMAGE_WIDTH_SHARE;
            (w, w * 0.75)
        }
    };
    let scale = (max_width / width).min(max_height / height).min(1.0);
    (width * scale, height * scale)
}

fn placeholder_caption(src: &str) -> String {
    if src.starts_with("data:") {
        "embedded image".to_string()
    } else {
        src.to_string()
    }
}

impl<C: Canvas + ?Sized> Renderer<'_, C> {
    pub(super) async fn image(&mut self, src: &str, width: Option<f64>, height: Option<f64>) -> Result<(), CanvasError> {
        let layout = self.layout;
        let bytes = match load_image(self.images, src, layout.image_timeout).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.note(format!("image not embedded ({e})"));
                return self.image_placeholder(src);
            }
        };

        let pixels = pixel_dimensions(&bytes)
            .map(|(w, h)| (f64::from(w), f64::from(h)))
            .or(width.zip(height));
        let (w, h) = display_size(
            pixels,
            layout.content_width(),
            layout.content_height() * MAX_IMAGE_HEIGHT_SHARE,
        );
        debug!(w, h, "embedding image");

        self.reserve(h)?;
        let x = layout.margin_left + (layout.content_width() - w) / 2.0;
        match self.canvas.draw_image(&bytes, x, self.cursor.y(), w, h) {
            Ok(()) => {
                self.cursor.advance(h + layout.item_spacing);
                Ok(())
            }
            Err(e) => {
                self.note(format!("image draw failed ({e})"));
                self.image_placeholder(src)
            }
        }
    }

    /// Labelled box with the source URL.
    pub(super) fn image_placeholder(&mut self, src: &str) -> Result<(), CanvasError> {
        let layout = self.layout;
        let label = Font::bold(layout.body_font_size);
        let small = Font::helvetica(layout.table_font_size);
        let label_height = label.line_height(layout.line_height_factor);
        let url_height = small.line_height(layout.line_height_factor);
        let inner_width = layout.content_width() - 2.0 * PLACEHOLDER_PADDING;

        self.canvas.set_font(small)?;
        let url_lines = wrap_text(&*self.canvas, &placeholder_caption(src), inner_width)?;
        let box_height = 2.0 * PLACEHOLDER_PADDING + label_height + url_lines.len() as f64 * url_height;

        self.reserve(box_height)?;
        let top = self.cursor.y();
        self.canvas.set_fill_color(PLACEHOLDER_FILL);
        self.canvas.set_draw_color(PLACEHOLDER_BORDER);
        self.canvas
            .draw_rect(layout.margin_left, top, layout.content_width(), box_height, RectStyle::FillStroke)?;

        let x = layout.margin_left + PLACEHOLDER_PADDING;
        self.canvas.set_font(label)?;
        self.canvas.set_text_color(PLACEHOLDER_LABEL);
        self.canvas
            .draw_text(&["Image".to_string()], x, top + PLACEHOLDER_PADDING, label_height)?;
        self.canvas.set_font(small)?;
        self.canvas.set_text_color(PLACEHOLDER_URL);
        self.canvas
            .draw_text(&url_lines, x, top + PLACEHOLDER_PADDING + label_height, url_height)?;

        self.cursor.advance(box_height + layout.item_spacing);
        Ok(())
    }
}
