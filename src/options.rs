//! Configuration options for extraction and layout.
//!
//! `Options` controls the DOM extraction and cleanup passes, `LayoutOptions`
//! controls page geometry and typography for the layout engine.

use std::time::Duration;

/// Configuration options for conversation extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_chat_export::Options;
///
/// let options = Options {
///     keep_extended_unicode: false,
///     max_table_rows: 25,
///     ..Options::default()
/// };
/// assert_eq!(options.min_image_width, 50);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Keep non-ASCII characters (emoji, symbols, accents) in sanitized text.
    ///
    /// When false, every character outside printable ASCII is replaced by a
    /// space before whitespace is collapsed.
    ///
    /// Default: `true`
    pub keep_extended_unicode: bool,

    /// Images narrower than this (pixels) are treated as icons and skipped.
    ///
    /// Default: `50`
    pub min_image_width: u32,

    /// Images shorter than this (pixels) are treated as icons and skipped.
    ///
    /// Default: `50`
    pub min_image_height: u32,

    /// Maximum number of body rows kept per table.
    ///
    /// Default: `10`
    pub max_table_rows: usize,

    /// Suffixes stripped from the document title.
    ///
    /// Default: `[" - ChatGPT", " | ChatGPT"]`
    pub title_suffixes: Vec<String>,

    /// Title used when the document title is empty after suffix stripping.
    ///
    /// Default: `"ChatGPT Conversation"`
    pub default_title: String,

    /// Number of leading characters of a code block used as its dedup key.
    ///
    /// Default: `50`
    pub code_dedup_prefix_len: usize,

    /// Attribute carrying a pre-computed bounding-box top for a node.
    ///
    /// Page snapshot tools write this so the extractor can restore visual
    /// order. Used by `AttributeGeometry`.
    ///
    /// Default: `"data-top"`
    pub geometry_attribute: String,

    /// Base URL used to resolve relative image sources.
    ///
    /// Default: `None`
    pub base_url: Option<String>,

    /// Strip "You said:" / "ChatGPT said:" style prefixes during cleanup.
    ///
    /// Default: `true`
    pub strip_speaker_prefixes: bool,

    /// Fixed message timestamp. `None` uses the local wall clock.
    ///
    /// Default: `None`
    pub timestamp: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            keep_extended_unicode: true,
            min_image_width: 50,
            min_image_height: 50,
            max_table_rows: 10,
            title_suffixes: vec![" - ChatGPT".to_string(), " | ChatGPT".to_string()],
            default_title: "ChatGPT Conversation".to_string(),
            code_dedup_prefix_len: 50,
            geometry_attribute: "data-top".to_string(),
            base_url: None,
            strip_speaker_prefixes: true,
            timestamp: None,
        }
    }
}

/// Page geometry and typography for the layout engine.
///
/// Lengths are in millimetres, font sizes in points.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Page width. Default: `210.0` (A4)
    pub page_width: f64,
    /// Page height. Default: `297.0` (A4)
    pub page_height: f64,
    /// Top margin; continuation pages start here. Default: `20.0`
    pub margin_top: f64,
    /// Bottom margin; nothing is drawn below `page_height - margin_bottom`. Default: `20.0`
    pub margin_bottom: f64,
    /// Left margin. Default: `20.0`
    pub margin_left: f64,
    /// Right margin. Default: `20.0`
    pub margin_right: f64,

    /// Where the first message starts on page one, below the title band. Default: `45.0`
    pub first_page_content_top: f64,

    /// Body text size. Default: `10.0`
    pub body_font_size: f64,
    /// Heading text size. Default: `11.0`
    pub heading_font_size: f64,
    /// Speaker label size. Default: `11.0`
    pub speaker_font_size: f64,
    /// Code block text size. Default: `8.0`
    pub code_font_size: f64,
    /// Equation text size. Default: `12.0`
    pub equation_font_size: f64,
    /// Table text size. Default: `8.0`
    pub table_font_size: f64,
    /// Document title size. Default: `18.0`
    pub title_font_size: f64,

    /// Line height as a multiple of the font size. Default: `1.15`
    pub line_height_factor: f64,

    /// Vertical gap between items of the same message. Default: `3.0`
    pub item_spacing: f64,

    /// Vertical gap after each message. Default: `5.0`
    pub message_spacing: f64,

    /// How long to wait for an image before drawing a placeholder.
    ///
    /// Default: 5 seconds
    pub image_timeout: Duration,

    /// Print a small "(continued)" marker on pages a message overflows onto.
    ///
    /// Default: `true`
    pub continuation_marker: bool,

    /// Header label for user messages. Default: `"User"`
    pub user_label: String,
    /// Header label for assistant messages. Default: `"Assistant"`
    pub assistant_label: String,

    /// Fixed "Exported on" text. `None` uses the local wall clock.
    ///
    /// Default: `None`
    pub exported_at: Option<String>,
}

impl LayoutOptions {
    /// Width available to content between the side margins.
    #[must_use]
    pub fn content_width(&self) -> f64 {
        (self.page_width - self.margin_left - self.margin_right).max(1.0)
    }

    /// Lowest y coordinate content may reach.
    #[must_use]
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin_bottom
    }

    /// Height available on a continuation page.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        (self.content_bottom() - self.margin_top).max(1.0)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            margin_right: 20.0,
            first_page_content_top: 45.0,
            body_font_size: 10.0,
            heading_font_size: 11.0,
            speaker_font_size: 11.0,
            code_font_size: 8.0,
            equation_font_size: 12.0,
            table_font_size: 8.0,
            title_font_size: 18.0,
            line_height_factor: 1.15,
            item_spacing: 3.0,
            message_spacing: 5.0,
            image_timeout: Duration::from_secs(5),
            continuation_marker: true,
            user_label: "User".to_string(),
            assistant_label: "Assistant".to_string(),
            exported_at: None,
        }
    }
}
