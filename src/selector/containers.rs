//! Message container strategies.
//!
//! The page's message markup has changed many times. Each strategy is one
//! CSS selector for a known generation of it, ordered from the most
//! structural to a generic text-block fallback. The first strategy that
//! yields at least one usable container wins.

use std::collections::HashSet;

use dom_query::{Document, Selection};
use tracing::debug;

use crate::dom;
use crate::sanitize::is_control_label;
use crate::selector::chrome;

/// One way of locating message containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub name: &'static str,
    pub selector: &'static str,
}

/// Strategies in priority order.
pub const STRATEGIES: &[Strategy] = &[
    Strategy { name: "main-article", selector: "main article" },
    Strategy { name: "turn-test-id", selector: r#"[data-testid^="conversation-turn"]"# },
    Strategy { name: "author-role", selector: "[data-message-author-role]" },
    Strategy { name: "group-row", selector: "div.group.w-full" },
    Strategy { name: "min-height-block", selector: r#"div[class*="min-h-"]"# },
    Strategy {
        name: "text-block",
        selector: r#"div[class*="markdown"], div[class*="whitespace-pre-wrap"], div[class*="text-message"]"#,
    },
];

/// A container worth extracting: has text, is not a UI surface, and is
/// not just a control label.
#[must_use]
pub fn is_valid_container(sel: &Selection) -> bool {
    if chrome::is_chrome(sel) || chrome::has_non_message_class(sel) {
        return false;
    }
    let text = dom::normalized_text(sel);
    !text.is_empty() && !is_control_label(&text)
}

/// Keep only matches with no other match among their ancestors.
#[must_use]
pub fn outermost<'a>(matches: Vec<Selection<'a>>) -> Vec<Selection<'a>> {
    let ids: HashSet<_> = matches.iter().filter_map(dom::node_id).collect();
    matches
        .into_iter()
        .filter(|sel| {
            !dom::ancestors(sel)
                .iter()
                .filter_map(dom::node_id)
                .any(|id| ids.contains(&id))
        })
        .collect()
}

/// Containers found by one strategy, in document order.
#[must_use]
pub fn apply<'a>(doc: &'a Document, strategy: &Strategy) -> Vec<Selection<'a>> {
    let matches: Vec<Selection<'a>> = doc
        .select(strategy.selector)
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .collect();
    outermost(matches)
        .into_iter()
        .filter(is_valid_container)
        .collect()
}

/// Run the strategies in order; first non-empty result wins.
#[must_use]
pub fn locate<'a>(doc: &'a Document) -> Option<(&'static Strategy, Vec<Selection<'a>>)> {
    for strategy in STRATEGIES {
        let found = apply(doc, strategy);
        debug!(strategy = strategy.name, containers = found.len(), "container strategy");
        if !found.is_empty() {
            return Some((strategy, found));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_strategy_wins() {
        let doc = dom::parse(
            r#"<main>
                 <article><div class="group w-full">one</div></article>
                 <article><div class="group w-full">two</div></article>
               </main>"#,
        );
        let (strategy, found) = locate(&doc).unwrap();
        assert_eq!(strategy.name, "main-article");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_falls_through_empty_strategies() {
        let doc = dom::parse(r#"<div class="min-h-[20px]">hello</div>"#);
        let (strategy, found) = locate(&doc).unwrap();
        assert_eq!(strategy.name, "min-height-block");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_invalid_containers_skipped() {
        let doc = dom::parse(
            r#"<div class="group w-full cursor-pointer">New chat</div>
               <div class="group w-full">  </div>
               <div class="group w-full">Copy</div>
               <div class="group w-full">real</div>"#,
        );
        let found = apply(&doc, &STRATEGIES[3]);
        assert_eq!(found.len(), 1);
        assert_eq!(dom::normalized_text(&found[0]), "real");
    }

    #[test]
    fn test_nested_matches_keep_outermost() {
        let doc = dom::parse(
            r#"<div data-message-author-role="user" id="outer">
                 <div data-message-author-role="user">inner</div>
               </div>"#,
        );
        let found = apply(&doc, &STRATEGIES[2]);
        assert_eq!(found.len(), 1);
        assert_eq!(dom::get_attribute(&found[0], "id"), Some("outer".to_string()));
    }

    #[test]
    fn test_no_strategy_matches() {
        let doc = dom::parse("<p>just a page</p>");
        assert!(locate(&doc).is_none());
    }
}
