//! Block extractor.
//!
//! Walks one message container in document order and turns candidate nodes
//! into positioned items. Atomic payloads (code, math, tables, images)
//! consume their whole subtree; text blocks consume only the inline
//! elements folded into their text, so a paragraph's child list or image
//! is still visited on its own.

use dom_query::Selection;
use tracing::{debug, trace};

use super::state::ExtractionState;
use crate::classifier;
use crate::dom;
use crate::geometry::Geometry;
use crate::options::Options;
use crate::result::{Item, ItemKind};
use crate::selector::chrome;

/// Extracts the items of one message container.
pub struct BlockExtractor<'a> {
    opts: &'a Options,
    geometry: &'a dyn Geometry,
}

impl<'a> BlockExtractor<'a> {
    #[must_use]
    pub fn new(opts: &'a Options, geometry: &'a dyn Geometry) -> Self {
        Self { opts, geometry }
    }

    /// Items of `container` in traversal order, each with a `y`.
    #[must_use]
    pub fn extract(&self, container: &Selection) -> Vec<Item> {
        let mut state = ExtractionState::new();
        let mut items = Vec::new();

        let nodes = std::iter::once(container.clone()).chain(dom::descendant_elements(container));
        for node in nodes {
            let Some(id) = dom::node_id(&node) else {
                continue;
            };
            if state.is_consumed(id) {
                continue;
            }
            if chrome::is_chrome(&node) {
                consume_subtree(&mut state, &node);
                continue;
            }
            let Some(kind) = classifier::node_kind(&node) else {
                continue;
            };

            let item = classifier::classify(&node, self.opts);
            state.consume(id);
            if kind == ItemKind::Text {
                state.consume_all(classifier::block_text(&node).covered);
            } else {
                consume_subtree(&mut state, &node);
            }

            match item {
                Some(mut item) => {
                    let y = state.position(self.geometry.top(&node));
                    item.set_y(Some(y));
                    trace!(kind = ?item.kind(), y, "item");
                    items.push(item);
                }
                None => debug!(?kind, "candidate node yielded no item"),
            }
        }
        items
    }
}

fn consume_subtree(state: &mut ExtractionState, node: &Selection) {
    state.consume_all(dom::descendant_elements(node).iter().filter_map(dom::node_id));
}
