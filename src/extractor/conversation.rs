//! Conversation extractor.
//!
//! Locates message containers, filters re-rendered duplicates, attributes
//! speakers, and collects each container's items into a message. Never
//! returns an empty message list.

use chrono::{DateTime, Local};
use dom_query::{Document, NodeRef, Selection};
use tracing::{debug, info, warn};

use super::block::BlockExtractor;
use super::speaker::{self, SpeakerHint};
use crate::dom;
use crate::geometry::Geometry;
use crate::options::Options;
use crate::result::{Conversation, Item, Message, Speaker};
use crate::sanitize::sanitize_with;
use crate::selector::{chrome, containers};

/// Text of the synthetic message emitted when a page yields nothing.
pub const EMPTY_PAGE_DIAGNOSTIC: &str =
    "No conversation content could be extracted from this page. \
     Make sure a conversation is open and fully loaded, then try again.";

/// Conversation title from the document `<title>`, with known suffixes
/// stripped.
#[must_use]
pub fn title(doc: &Document, opts: &Options) -> String {
    let mut title = dom::normalized_text(&doc.select("title"));
    for suffix in &opts.title_suffixes {
        let stripped = title
            .strip_suffix(suffix.as_str())
            .or_else(|| title.strip_suffix(suffix.trim_start()));
        if let Some(stripped) = stripped {
            title = stripped.trim_end().to_string();
        }
    }
    if title.trim().is_empty() {
        opts.default_title.clone()
    } else {
        title
    }
}

/// Message time: a `<time datetime>` inside the container, else the
/// configured timestamp, else the local wall clock.
#[must_use]
pub fn timestamp(container: &Selection, opts: &Options) -> String {
    let time = dom::query_selector(container, "time[datetime]");
    if let Some(raw) = dom::get_attribute(&time, "datetime") {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
            return parsed.format("%H:%M:%S").to_string();
        }
    }
    configured_or_now(opts)
}

fn configured_or_now(opts: &Options) -> String {
    opts.timestamp
        .clone()
        .unwrap_or_else(|| Local::now().format("%H:%M:%S").to_string())
}

/// Visible text of a subtree, skipping chrome, with block boundaries as
/// spaces.
fn visible_text(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            if chrome::is_chrome(&Selection::from(child)) {
                continue;
            }
            out.push(' ');
            visible_text(&child, out);
            out.push(' ');
        }
    }
}

/// Single message built from the whole page body, or a diagnostic message
/// when the body has no usable text either.
#[must_use]
pub fn fallback_message(doc: &Document, opts: &Options) -> Message {
    let body = doc.select("body");
    let mut raw = String::new();
    if let Some(node) = body.nodes().first() {
        visible_text(node, &mut raw);
    }
    let text = sanitize_with(&raw, opts.keep_extended_unicode);

    let content = if text.is_empty() {
        warn!("page has no extractable text, emitting diagnostic message");
        EMPTY_PAGE_DIAGNOSTIC.to_string()
    } else {
        info!(chars = text.len(), "no message containers found, using page text");
        text
    };
    Message {
        speaker: Speaker::Assistant,
        timestamp: configured_or_now(opts),
        items: vec![Item::text(content).at(0.0)],
    }
}

/// Extracts a whole conversation from a parsed page.
pub struct ConversationExtractor<'a> {
    opts: &'a Options,
    geometry: &'a dyn Geometry,
}

impl<'a> ConversationExtractor<'a> {
    #[must_use]
    pub fn new(opts: &'a Options, geometry: &'a dyn Geometry) -> Self {
        Self { opts, geometry }
    }

    /// Messages from located containers, without the fallback.
    #[must_use]
    pub fn messages(&self, doc: &Document) -> Vec<Message> {
        let Some((strategy, found)) = containers::locate(doc) else {
            debug!("no container strategy matched");
            return Vec::new();
        };
        debug!(strategy = strategy.name, containers = found.len(), "extracting messages");

        let hint = SpeakerHint::for_page(doc);
        let blocks = BlockExtractor::new(self.opts, self.geometry);
        let mut messages = Vec::new();
        let mut previous_text: Option<String> = None;

        for container in &found {
            let text = dom::normalized_text(container);
            if previous_text.as_deref() == Some(text.as_str()) {
                debug!("skipping adjacent duplicate container");
                continue;
            }
            previous_text = Some(text);

            let items = blocks.extract(container);
            if items.is_empty() {
                debug!("container produced no items");
                continue;
            }
            messages.push(Message {
                speaker: speaker::detect(container, hint.at(messages.len())),
                timestamp: timestamp(container, self.opts),
                items,
            });
        }
        messages
    }

    /// Full conversation; falls back to page text when no message is found.
    #[must_use]
    pub fn extract(&self, doc: &Document) -> Conversation {
        let mut messages = self.messages(doc);
        if messages.is_empty() {
            messages.push(fallback_message(doc, self.opts));
        }
        Conversation { title: title(doc, self.opts), messages }
    }
}

/// Extract a conversation with the given options and geometry.
#[must_use]
pub fn extract_conversation(doc: &Document, opts: &Options, geometry: &dyn Geometry) -> Conversation {
    ConversationExtractor::new(opts, geometry).extract(doc)
}
