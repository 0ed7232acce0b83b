//! Speaker detection.
//!
//! Checked in order, first match wins:
//!
//! 1. an explicit `data-message-author-role` on the container, an ancestor,
//!    or (for wrapper containers) the first descendant carrying one;
//! 2. the "self message" background class (`dark:bg-gray-800`), when the
//!    page uses it at all;
//! 3. alternating turns by container position.
//!
//! The third step is a guess. Pages that drop both markers get correct
//! attribution only when turns strictly alternate starting with the user.

use dom_query::{Document, Selection};

use crate::dom;
use crate::result::Speaker;

const ROLE_ATTRIBUTE: &str = "data-message-author-role";
const SELF_MESSAGE_CLASS: &str = "dark:bg-gray-800";

/// What the conversation extractor knows about a container before looking
/// inside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakerHint {
    /// Position among accepted containers.
    pub index: usize,
    /// The page marks self messages with a background class anywhere.
    pub page_marks_self: bool,
}

impl SpeakerHint {
    /// Build a hint for a page.
    #[must_use]
    pub fn for_page(doc: &Document) -> Self {
        let page_marks_self = !doc
            .select(&format!(r#"[class*="{SELF_MESSAGE_CLASS}"]"#))
            .nodes()
            .is_empty();
        Self { index: 0, page_marks_self }
    }

    #[must_use]
    pub fn at(self, index: usize) -> Self {
        Self { index, ..self }
    }
}

fn role_speaker(role: &str) -> Option<Speaker> {
    match role.trim().to_ascii_lowercase().as_str() {
        "user" => Some(Speaker::User),
        "assistant" | "tool" | "system" => Some(Speaker::Assistant),
        _ => None,
    }
}

/// Speaker from an explicit role marker.
#[must_use]
pub fn explicit_role(container: &Selection) -> Option<Speaker> {
    let marked = dom::closest(container, |s| dom::has_attribute(s, ROLE_ATTRIBUTE))
        .or_else(|| {
            let inner = dom::query_selector(container, &format!("[{ROLE_ATTRIBUTE}]"));
            inner.exists().then_some(inner)
        })?;
    dom::get_attribute(&marked, ROLE_ATTRIBUTE).and_then(|r| role_speaker(&r))
}

/// Container (or an ancestor) carries the self-message background class.
#[must_use]
pub fn has_self_marker(container: &Selection) -> bool {
    dom::closest(container, |s| dom::class_contains(s, SELF_MESSAGE_CLASS)).is_some()
}

/// Decide who wrote a container.
#[must_use]
pub fn detect(container: &Selection, hint: SpeakerHint) -> Speaker {
    if let Some(speaker) = explicit_role(container) {
        return speaker;
    }
    if hint.page_marks_self {
        return if has_self_marker(container) { Speaker::User } else { Speaker::Assistant };
    }
    Speaker::by_parity(hint.index)
}
