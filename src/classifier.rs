//! Fragment classifier.
//!
//! Given one DOM node, decide what kind of content it is and pull out the
//! payload. Node kinds are tried in a fixed priority order (code, math,
//! table, image, text); the first matching rule decides, and its extractor
//! may still reject the node (icon-sized image, empty table, UI label).

use dom_query::{NodeId, NodeRef, Selection};
use url::Url;

use crate::dom;
use crate::options::Options;
use crate::result::{Item, ItemKind};
use crate::sanitize::{is_control_label, sanitize_code, sanitize_with};
use crate::selector::{chrome, content, Rule};

/// Node rules in priority order.
pub const NODE_RULES: &[(Rule, ItemKind)] = &[
    (content::is_code_container, ItemKind::Code),
    (content::is_math_container, ItemKind::Equation),
    (content::is_table, ItemKind::Table),
    (content::is_image, ItemKind::Image),
    (content::is_text_block, ItemKind::Text),
];

/// Kind of node by structural signal, ignoring payload.
#[must_use]
pub fn node_kind(node: &Selection) -> Option<ItemKind> {
    NODE_RULES
        .iter()
        .find(|(rule, _)| rule(node))
        .map(|(_, kind)| *kind)
}

/// Classify a node into an item. `None` for UI chrome, non-content nodes,
/// and nodes whose payload turns out empty.
///
/// The returned item has no position; the block extractor assigns one.
#[must_use]
pub fn classify(node: &Selection, opts: &Options) -> Option<Item> {
    if chrome::is_chrome(node) {
        return None;
    }
    match node_kind(node)? {
        ItemKind::Code => extract_code(node),
        ItemKind::Equation => extract_equation(node),
        ItemKind::Table => extract_table(node, opts),
        ItemKind::Image => extract_image(node, opts),
        ItemKind::Text => extract_text(node, opts),
    }
}

// === Code ===

/// Language from a `language-*` (or `lang-*`) class on the `pre` or its `code`.
#[must_use]
pub fn code_language(pre: &Selection) -> String {
    let code = dom::query_selector(pre, "code");
    let language = [pre, &code]
        .into_iter()
        .flat_map(dom::class_tokens)
        .find_map(|token| {
            token
                .strip_prefix("language-")
                .or_else(|| token.strip_prefix("lang-"))
                .filter(|lang| !lang.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();
    language
}

fn extract_code(pre: &Selection) -> Option<Item> {
    let code = dom::query_selector(pre, "code");
    let raw = if code.exists() {
        dom::text_content(&code)
    } else {
        dom::text_content(pre)
    };
    let content = sanitize_code(&raw);
    if content.is_empty() {
        return None;
    }
    Some(Item::code(content, code_language(pre)))
}

// === Equations ===

fn extract_equation(node: &Selection) -> Option<Item> {
    // A display wrapper holds the inner `.katex`; read from the wrapper.
    let content = content::latex_source(node)
        .unwrap_or_else(|| content::rendered_math_text(node));
    let content = content.trim().to_string();
    if content.is_empty() {
        return None;
    }
    Some(Item::Equation { content, y: None, is_rendered: Some(true) })
}

// === Tables ===

fn cell_texts(row: &Selection, keep_unicode: bool) -> Vec<String> {
    dom::query_selector_all(row, "th, td")
        .nodes()
        .iter()
        .map(|cell| sanitize_with(&Selection::from(*cell).text(), keep_unicode))
        .collect()
}

/// Rows belonging to this table, skipping rows of nested tables.
fn own_rows<'a>(table: &Selection<'a>) -> Vec<Selection<'a>> {
    let Some(table_id) = dom::node_id(table) else {
        return Vec::new();
    };
    dom::query_selector_all(table, "tr")
        .nodes()
        .iter()
        .map(|n| Selection::from(*n))
        .filter(|row| {
            dom::closest(&dom::parent(row), |s| dom::is_tag(s, "table"))
                .and_then(|t| dom::node_id(&t))
                == Some(table_id)
        })
        .collect()
}

fn extract_table(table: &Selection, opts: &Options) -> Option<Item> {
    let keep = opts.keep_extended_unicode;
    let rows = own_rows(table);

    let header_index = rows.iter().position(|row| {
        dom::ancestors(row).iter().any(|a| dom::is_tag(a, "thead"))
            || (dom::query_selector(row, "th").exists() && !dom::query_selector(row, "td").exists())
    });
    // Only the first row group can hold the header.
    let header_index = header_index.filter(|i| *i == 0);

    let headers: Vec<String> = header_index
        .map(|i| cell_texts(&rows[i], keep))
        .unwrap_or_default()
        .into_iter()
        .filter(|h| !h.is_empty())
        .collect();

    let body: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != header_index)
        .map(|(_, row)| cell_texts(row, keep))
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .take(opts.max_table_rows)
        .collect();

    if headers.is_empty() && body.is_empty() {
        return None;
    }
    Some(Item::Table { headers, rows: body, y: None })
}

// === Images ===

fn dimension(img: &Selection, attr: &str) -> Option<f64> {
    dom::numeric_attribute(img, attr).filter(|v| v.is_finite() && *v > 0.0)
}

/// Resolve an image source against the configured base URL.
#[must_use]
pub fn resolve_source(src: &str, base_url: Option<&str>) -> String {
    let src = src.trim();
    if src.starts_with("data:") {
        return src.to_string();
    }
    if let Ok(absolute) = Url::parse(src) {
        return absolute.to_string();
    }
    base_url
        .and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(src).ok())
        .map_or_else(|| src.to_string(), |u| u.to_string())
}

fn extract_image(img: &Selection, opts: &Options) -> Option<Item> {
    let src = dom::get_attribute(img, "src")
        .or_else(|| dom::get_attribute(img, "data-src"))
        .filter(|s| !s.trim().is_empty())?;

    let width = dimension(img, "width");
    let height = dimension(img, "height");
    let too_small = width.is_some_and(|w| w < f64::from(opts.min_image_width))
        || height.is_some_and(|h| h < f64::from(opts.min_image_height));
    if too_small {
        return None;
    }

    Some(Item::Image {
        content: resolve_source(&src, opts.base_url.as_deref()),
        width,
        height,
        y: None,
    })
}

// === Text ===

/// Collected inline text of a text block plus the nodes it covered.
#[derive(Debug, Default)]
pub struct InlineText {
    pub text: String,
    /// Inline math fragments folded into `text`.
    pub math: Vec<String>,
    /// Descendant elements whose content is already represented.
    pub covered: Vec<NodeId>,
}

/// Gather the text of `node` without descending into child blocks.
///
/// Inline math is rendered as its LaTeX source; chrome is skipped; child
/// blocks (paragraphs, lists, code, tables, images, display math) are left
/// for the block extractor to visit on their own.
#[must_use]
pub fn inline_text(node: &Selection) -> InlineText {
    let mut out = InlineText::default();
    if let Some(root) = node.nodes().first() {
        collect_inline(root, &mut out);
    }
    out
}

/// Text of a text block as the block extractor emits it.
///
/// Same as [`inline_text`], except for a list item whose text sits in child
/// paragraphs (`<li><p>…</p></li>`): those paragraphs are folded in and
/// covered. Nested lists and atomic blocks stay separate.
#[must_use]
pub fn block_text(node: &Selection) -> InlineText {
    let mut out = inline_text(node);
    if !dom::is_tag(node, "li") || !out.text.trim().is_empty() {
        return out;
    }
    let Some(root) = node.nodes().first() else {
        return out;
    };
    for child in root.children() {
        if !child.is_element() {
            continue;
        }
        let sel = Selection::from(child);
        if dom::is_one_of_tags(&sel, &["ul", "ol", "li"])
            || !content::is_text_block(&sel)
            || chrome::is_chrome(&sel)
        {
            continue;
        }
        let inner = inline_text(&sel);
        if !out.text.trim().is_empty() {
            out.text.push(' ');
        }
        out.text.push_str(&inner.text);
        out.math.extend(inner.math);
        out.covered.extend(inner.covered);
        out.covered.push(child.id);
    }
    out
}

fn collect_inline(node: &NodeRef, out: &mut InlineText) {
    for child in node.children() {
        if child.is_text() {
            out.text.push_str(&child.text());
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let sel = Selection::from(child);
        if chrome::is_chrome(&sel) {
            out.covered.push(child.id);
            continue;
        }
        if content::is_inline_math(&sel) {
            let latex = content::latex_source(&sel)
                .unwrap_or_else(|| content::rendered_math_text(&sel));
            out.text.push(' ');
            out.text.push_str(&latex);
            out.text.push(' ');
            out.math.push(latex);
            out.covered.extend(dom::descendant_elements(&sel).iter().filter_map(dom::node_id));
            out.covered.push(child.id);
            continue;
        }
        if content::is_block(&sel) {
            continue;
        }
        if dom::is_tag(&sel, "br") {
            out.text.push(' ');
        }
        out.covered.push(child.id);
        collect_inline(&child, out);
    }
}

/// List marker for an `li`: `• ` or `N. `, with two extra spaces per level
/// of list nesting inside the message.
fn list_marker(li: &Selection) -> String {
    let lists: Vec<Selection> = dom::ancestors(li)
        .into_iter()
        .filter(|a| dom::is_one_of_tags(a, &["ul", "ol"]))
        .collect();
    let depth = lists.len().saturating_sub(1).min(3);
    let indent = "  ".repeat(depth);

    match lists.first() {
        Some(list) if dom::is_tag(list, "ol") => {
            let start = dom::numeric_attribute(list, "start").map_or(1, |s| s as i64);
            let position = list_position(li);
            format!("{}. {indent}", start + position as i64)
        }
        _ => format!("• {indent}"),
    }
}

/// Zero-based index of `li` among its `li` siblings.
fn list_position(li: &Selection) -> usize {
    let Some(id) = dom::node_id(li) else {
        return 0;
    };
    dom::parent(li)
        .children()
        .nodes()
        .iter()
        .filter(|n| n.node_name().is_some_and(|t| t.eq_ignore_ascii_case("li")))
        .position(|n| n.id == id)
        .unwrap_or(0)
}

fn extract_text(node: &Selection, opts: &Options) -> Option<Item> {
    let collected = block_text(node);
    let text = sanitize_with(&collected.text, opts.keep_extended_unicode);
    if text.is_empty() || is_control_label(&text) {
        return None;
    }

    // A paragraph that is nothing but one formula is an equation.
    if let [only] = collected.math.as_slice() {
        if text == sanitize_with(only, opts.keep_extended_unicode) {
            return Some(Item::Equation { content: only.trim().to_string(), y: None, is_rendered: Some(true) });
        }
    }

    if dom::is_tag(node, "li") {
        return Some(Item::text(format!("{}{text}", list_marker(node))));
    }
    Some(Item::text(text))
}
