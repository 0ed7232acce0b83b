//! Selector infrastructure.
//!
//! Rules are plain predicate functions over a `Selection`. All knowledge of
//! the page's class names, attributes and tag shapes lives here.
//!
//! - `chrome`: UI chrome and decorative elements
//! - `content`: payload containers (code, math, tables, images, text blocks)
//! - `containers`: ordered strategies for locating message containers

use dom_query::Selection;

pub mod chrome;
pub mod containers;
pub mod content;

/// A selector rule that tests if a selection matches certain criteria.
pub type Rule = fn(&Selection) -> bool;
