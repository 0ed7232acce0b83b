//! # rs-chat-export
//!
//! Extracts chat conversations from web page DOM snapshots and lays them
//! out as paginated documents.
//!
//! The page structure of chat front-ends is unstable and undocumented, so
//! extraction is heuristic: message containers are located with an ordered
//! list of selector strategies, each container is walked in document order
//! and its nodes classified into text, code, equations, tables and images,
//! and a cleanup pass removes the duplicates and UI leftovers the page
//! markup produces. The layout engine then renders the cleaned
//! conversation onto any [`layout::Canvas`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_chat_export::{extract, Speaker};
//!
//! let html = r#"<html><head><title>Momentum - ChatGPT</title></head><body>
//!   <div data-message-author-role="user"><p>What is momentum?</p></div>
//!   <div data-message-author-role="assistant"><p>Mass times velocity:</p>
//!     <p>p = m v</p></div>
//! </body></html>"#;
//!
//! let conversation = extract(html);
//! assert_eq!(conversation.title, "Momentum");
//! assert_eq!(conversation.messages.len(), 2);
//! assert_eq!(conversation.messages[1].speaker, Speaker::Assistant);
//! ```
//!
//! ## Pipeline
//!
//! page DOM → [`extractor`] (containers, speakers, per-node [`classifier`])
//! → [`cleanup`] (dedup, reclassification, ordering) → [`layout`]
//! (pagination onto a canvas).
//!
//! Extraction and cleanup never fail: a page without recognizable chat
//! markup yields a single message built from the page text, or a
//! diagnostic message when the page has no text at all.

mod error;
mod options;
mod patterns;
mod result;

/// DOM access helpers over `dom_query`.
pub mod dom;

/// Vertical position lookups for DOM nodes.
pub mod geometry;

/// Selector rules for chrome, content kinds and message containers.
pub mod selector;

/// Text sanitizing for extracted fragments.
pub mod sanitize;

/// Equation dedup keys and display formatting.
pub mod equation;

/// Per-node content classification.
pub mod classifier;

/// Conversation and per-container extraction.
pub mod extractor;

/// Deduplication and cleanup pass.
pub mod cleanup;

/// Layout and pagination engine.
pub mod layout;

/// Request/response channel to a page endpoint.
pub mod transport;

/// Page snapshot decoding.
pub mod encoding;

// Public API - re-exports
pub use error::{CanvasError, ChannelError, Error, ImageError, Result};
pub use options::{LayoutOptions, Options};
pub use result::{Conversation, Item, ItemKind, Message, Speaker};

use dom_query::Document;
use tracing::info;

use crate::cleanup::clean_conversation;
use crate::extractor::conversation::fallback_message;
use crate::extractor::ConversationExtractor;
use crate::geometry::{AttributeGeometry, Geometry};
use crate::layout::{Canvas, ImageSource, RenderedDocument};

/// Extracts and cleans a conversation using default options.
///
/// # Example
///
/// ```rust
/// let conversation = rs_chat_export::extract("<p>no chat here</p>");
/// assert_eq!(conversation.messages.len(), 1);
/// ```
#[must_use]
pub fn extract(html: &str) -> Conversation {
    extract_with_options(html, &Options::default())
}

/// Extracts and cleans a conversation with custom options.
///
/// Node positions are read from `options.geometry_attribute` when the
/// snapshot carries it.
///
/// # Example
///
/// ```rust
/// use rs_chat_export::{extract_with_options, Options};
///
/// let options = Options {
///     timestamp: Some("09:00:00".to_string()),
///     ..Options::default()
/// };
/// let html = r#"<div data-message-author-role="user"><p>Hi</p></div>"#;
/// let conversation = extract_with_options(html, &options);
/// assert_eq!(conversation.messages[0].timestamp, "09:00:00");
/// ```
#[must_use]
pub fn extract_with_options(html: &str, options: &Options) -> Conversation {
    let doc = dom::parse(html);
    let geometry = AttributeGeometry::new(options.geometry_attribute.clone());
    extract_document(&doc, options, &geometry)
}

/// Extracts from snapshot bytes, decoding them from their declared charset.
///
/// # Example
///
/// ```rust
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><p>Caf\xE9</p></body></html>";
/// let conversation = rs_chat_export::extract_bytes(html);
/// assert_eq!(conversation.messages[0].items[0].content(), Some("Café"));
/// ```
#[must_use]
pub fn extract_bytes(html: &[u8]) -> Conversation {
    extract_bytes_with_options(html, &Options::default())
}

/// Byte-input form of [`extract_with_options`].
#[must_use]
pub fn extract_bytes_with_options(html: &[u8], options: &Options) -> Conversation {
    let page = encoding::decode_snapshot(html);
    extract_with_options(&page.html, options)
}

/// Extracts and cleans a conversation from a parsed document.
///
/// If cleanup leaves no message (every item was a duplicate or a UI
/// label), the page-text fallback is applied again so the result is never
/// empty.
#[must_use]
pub fn extract_document(doc: &Document, options: &Options, geometry: &dyn Geometry) -> Conversation {
    let raw = ConversationExtractor::new(options, geometry).extract(doc);
    let raw_count = raw.messages.len();
    let mut conversation = clean_conversation(raw, options);
    if conversation.messages.is_empty() {
        conversation.messages.push(fallback_message(doc, options));
    }
    info!(
        raw = raw_count,
        messages = conversation.messages.len(),
        items = conversation.item_count(),
        "conversation extracted"
    );
    conversation
}

/// Extracts a conversation from `html` and renders it onto `canvas`.
///
/// # Errors
///
/// Returns an error only when the canvas cannot export the finished
/// document; item-level failures are recorded in
/// [`RenderedDocument::warnings`].
pub async fn export<C: Canvas + ?Sized>(
    html: &str,
    options: &Options,
    layout: &LayoutOptions,
    canvas: &mut C,
    images: &dyn ImageSource,
) -> Result<RenderedDocument> {
    let conversation = extract_with_options(html, options);
    layout::render(canvas, &conversation, layout, images).await
}
