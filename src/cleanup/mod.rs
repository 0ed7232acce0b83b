//! Deduplication and cleanup pass.
//!
//! Runs over extracted messages after the DOM walk. Per message, in order:
//!
//! 1. speaker prefixes are stripped from text (when enabled),
//! 2. equation-shaped text is reclassified as an equation,
//! 3. duplicates are dropped by text key, code prefix and equation key
//!    (equations against a set that spans the whole conversation),
//! 4. structural repeats and code captions are dropped,
//! 5. items are re-sorted by `y`.
//!
//! Messages left with no items are removed. The pass never fails; an item
//! no rule understands is kept as it is.

pub mod rules;
pub mod structural;

use std::collections::HashSet;

use tracing::debug;

use crate::equation;
use crate::options::Options;
use crate::result::{Conversation, Item, ItemKind, Message};
use crate::sanitize::is_control_label;

pub use rules::{code_key, is_heading, reclassify, strip_list_marker, text_key};
pub use structural::structural_dedup;

/// State threaded through the cleanup of one conversation.
///
/// Holds the equation keys seen so far, so a formula explained in one turn
/// and restated in a later one is only kept once. Build a fresh context per
/// conversation.
#[derive(Debug, Clone)]
pub struct CleanupContext {
    seen_equations: HashSet<String>,
    code_prefix_len: usize,
    strip_prefixes: bool,
}

impl CleanupContext {
    #[must_use]
    pub fn new(opts: &Options) -> Self {
        Self {
            seen_equations: HashSet::new(),
            code_prefix_len: opts.code_dedup_prefix_len,
            strip_prefixes: opts.strip_speaker_prefixes,
        }
    }

    /// Number of distinct equations kept so far.
    #[must_use]
    pub fn equation_count(&self) -> usize {
        self.seen_equations.len()
    }

    /// Record an equation key; false if it was already present.
    fn first_equation(&mut self, key: String) -> bool {
        self.seen_equations.insert(key)
    }
}

impl Default for CleanupContext {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

fn strip_prefix_item(item: Item) -> Item {
    match item {
        Item::Text { content, y } => Item::Text { content: rules::strip_speaker_prefixes(&content), y },
        other => other,
    }
}

/// Turn equation-shaped text into an equation item.
fn repair_kind(item: Item) -> Item {
    match item {
        Item::Text { content, y } if reclassify(&content) == ItemKind::Equation => {
            debug!(text = %content, "reclassifying text as equation");
            Item::Equation {
                content: strip_list_marker(&content).to_string(),
                y,
                is_rendered: Some(false),
            }
        }
        other => other,
    }
}

/// Drop blanks, leaked control labels and repeated items within one message.
fn dedup_items(items: Vec<Item>, ctx: &mut CleanupContext) -> Vec<Item> {
    let mut seen_text: HashSet<String> = HashSet::new();
    let mut seen_code: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());

    for item in items {
        if item.is_blank() {
            continue;
        }
        let keep = match &item {
            Item::Text { content, .. } => {
                !is_control_label(content.trim()) && seen_text.insert(text_key(content))
            }
            Item::Code { content, .. } => seen_code.insert(code_key(content, ctx.code_prefix_len)),
            Item::Equation { content, .. } => {
                let key = equation::normalize(content);
                key.is_empty() || ctx.first_equation(key)
            }
            Item::Table { .. } | Item::Image { .. } => true,
        };
        if keep {
            kept.push(item);
        } else {
            debug!(kind = ?item.kind(), "dropping duplicate item");
        }
    }
    kept
}

/// Stable sort by `y`. An item without a position takes the key of the item
/// before it, so it stays where it was inserted.
pub fn sort_by_position(items: &mut Vec<Item>) {
    let mut previous = f64::NEG_INFINITY;
    let mut keyed: Vec<(f64, Item)> = items
        .drain(..)
        .map(|item| {
            let key = item.y().filter(|y| y.is_finite()).unwrap_or(previous);
            previous = key;
            (key, item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

/// Clean one message's items.
#[must_use]
pub fn clean_items(items: Vec<Item>, ctx: &mut CleanupContext) -> Vec<Item> {
    let items: Vec<Item> = items
        .into_iter()
        .map(|item| if ctx.strip_prefixes { strip_prefix_item(item) } else { item })
        .map(repair_kind)
        .collect();
    let mut items = structural_dedup(dedup_items(items, ctx));
    sort_by_position(&mut items);
    items
}

/// Clean every message and drop the ones left empty.
#[must_use]
pub fn clean(messages: Vec<Message>, ctx: &mut CleanupContext) -> Vec<Message> {
    let before = messages.len();
    let cleaned: Vec<Message> = messages
        .into_iter()
        .filter_map(|message| {
            let items = clean_items(message.items, ctx);
            (!items.is_empty()).then_some(Message { items, ..message })
        })
        .collect();
    if cleaned.len() < before {
        debug!(dropped = before - cleaned.len(), "removed empty messages");
    }
    cleaned
}

/// Clean a whole conversation with a fresh context.
#[must_use]
pub fn clean_conversation(conversation: Conversation, opts: &Options) -> Conversation {
    let mut ctx = CleanupContext::new(opts);
    Conversation {
        messages: clean(conversation.messages, &mut ctx),
        ..conversation
    }
}
