//! Cross-item structural dedup.
//!
//! The page often yields the same list twice: once flattened into a
//! paragraph (or a heading with its children run together) and once as
//! separate list items. It also leaks code-block toolbar captions as text
//! right after the code.

use tracing::debug;

use super::rules::{is_code_caption, is_heading, is_list_item, text_key};
use crate::patterns::{BULLET_POINT, NUMBERED_SPLIT};
use crate::result::Item;

/// Points of a list flattened into one string (`• a • b`, `1. a 2. b`).
fn flattened_points(text: &str) -> Vec<String> {
    let bullets: Vec<String> = BULLET_POINT
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| text_key(m.as_str()))
        .filter(|k| !k.is_empty())
        .collect();
    if bullets.len() >= 2 {
        return bullets;
    }

    let numbered: Vec<String> = NUMBERED_SPLIT
        .split(text)
        .skip(1)
        .map(text_key)
        .filter(|k| !k.is_empty())
        .collect();
    if numbered.len() >= 2 {
        return numbered;
    }
    Vec::new()
}

/// Text that repeats, in one block, list entries that also appear on their
/// own elsewhere in the message.
fn repeats_separate_list(text: &str, list_keys: &[String]) -> bool {
    let points = flattened_points(text);
    !points.is_empty()
        && points
            .iter()
            .all(|point| list_keys.iter().any(|key| key.contains(point.as_str())))
}

/// Heading whose wording is carried again by a later list entry.
fn heading_restated_later(text: &str, later_list_keys: &[String]) -> bool {
    if !is_heading(text) || is_list_item(text) {
        return false;
    }
    let stem = text_key(text);
    !stem.is_empty() && later_list_keys.iter().any(|key| key.contains(stem.as_str()))
}

/// Drop flattened-list repeats, headings restated by a later list entry,
/// and short UI captions directly after a code block.
#[must_use]
pub fn structural_dedup(items: Vec<Item>) -> Vec<Item> {
    let list_keys: Vec<(usize, String)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Text { content, .. } if is_list_item(content) => Some((i, text_key(content))),
            _ => None,
        })
        .collect();

    let mut kept: Vec<Item> = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Item::Text { content, .. } = &item else {
            kept.push(item);
            continue;
        };

        if matches!(kept.last(), Some(Item::Code { .. })) && is_code_caption(content) {
            debug!(caption = %content, "dropping caption after code");
            continue;
        }

        let others: Vec<String> = list_keys
            .iter()
            .filter(|(i, _)| *i != index)
            .map(|(_, key)| key.clone())
            .collect();
        if repeats_separate_list(content, &others) {
            debug!("dropping text that repeats a separate list");
            continue;
        }

        let later: Vec<String> = list_keys
            .iter()
            .filter(|(i, _)| *i > index)
            .map(|(_, key)| key.clone())
            .collect();
        if heading_restated_later(content, &later) {
            debug!(heading = %content, "dropping heading restated by list");
            continue;
        }
        kept.push(item);
    }
    kept
}
