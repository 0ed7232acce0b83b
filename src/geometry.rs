//! Layout geometry lookups.
//!
//! A parsed snapshot has no layout engine behind it, so the vertical
//! position of a node has to come from somewhere else. Snapshot tools can
//! stamp each element with its bounding-box top; `AttributeGeometry` reads
//! that back. When nothing is known the block extractor synthesizes
//! increasing positions in traversal order.

use dom_query::Selection;

use crate::dom;

/// Source of vertical positions for DOM nodes.
pub trait Geometry {
    /// Bounding-box top of the node, if known.
    fn top(&self, node: &Selection) -> Option<f64>;
}

/// Reads the top coordinate from a numeric attribute (e.g. `data-top="120"`).
#[derive(Debug, Clone)]
pub struct AttributeGeometry {
    attribute: String,
}

impl AttributeGeometry {
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self { attribute: attribute.into() }
    }
}

impl Default for AttributeGeometry {
    fn default() -> Self {
        Self::new("data-top")
    }
}

impl Geometry for AttributeGeometry {
    fn top(&self, node: &Selection) -> Option<f64> {
        dom::numeric_attribute(node, &self.attribute).filter(|v| v.is_finite())
    }
}

/// No geometry available; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl Geometry for NoGeometry {
    fn top(&self, _node: &Selection) -> Option<f64> {
        None
    }
}
