//! Content container rules.
//!
//! Structural signals for the five payload kinds. The page's markup changes
//! often, so each rule accepts several shapes.

use dom_query::Selection;

use crate::dom;

/// Tags that start their own block and are never folded into a
/// surrounding paragraph's text.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "img", "li", "main", "ol", "p", "pre", "section", "table", "ul", "picture", "canvas",
];

/// Tags whose own text is a paragraph-like block.
const TEXT_BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "dt", "dd", "figcaption",
];

/// Preformatted code container.
#[must_use]
pub fn is_code_container(sel: &Selection) -> bool {
    dom::is_tag(sel, "pre")
}

/// Rendered math (KaTeX, MathJax, MathML or a bare `data-latex` holder).
#[must_use]
pub fn is_math_container(sel: &Selection) -> bool {
    if dom::has_class_token(sel, "katex-mathml") {
        return false;
    }
    dom::has_class_token(sel, "katex")
        || dom::has_class_token(sel, "katex-display")
        || dom::has_class_token(sel, "math-display")
        || dom::has_class_token(sel, "math-inline")
        || dom::class_contains(sel, "MathJax")
        || dom::has_attribute(sel, "data-latex")
        || dom::is_tag(sel, "math")
}

/// Math rendered as its own block rather than inline with prose.
#[must_use]
pub fn is_display_math(sel: &Selection) -> bool {
    dom::has_class_token(sel, "katex-display")
        || dom::has_class_token(sel, "math-display")
        || dom::class_contains(sel, "MathJax_Display")
        || (dom::is_tag(sel, "math")
            && dom::get_attribute(sel, "display").is_some_and(|d| d == "block"))
}

/// Math that belongs inside a sentence.
#[must_use]
pub fn is_inline_math(sel: &Selection) -> bool {
    is_math_container(sel) && !is_display_math(sel)
}

/// Table element.
#[must_use]
pub fn is_table(sel: &Selection) -> bool {
    dom::is_tag(sel, "table")
}

/// Image element.
#[must_use]
pub fn is_image(sel: &Selection) -> bool {
    dom::is_tag(sel, "img")
}

/// Paragraph-like element, or a `div`/`span` holding loose text directly.
#[must_use]
pub fn is_text_block(sel: &Selection) -> bool {
    if dom::is_one_of_tags(sel, TEXT_BLOCK_TAGS) {
        return true;
    }
    dom::is_one_of_tags(sel, &["div", "span", "section", "article"]) && has_direct_text(sel)
}

/// A direct child text node has non-whitespace content.
#[must_use]
pub fn has_direct_text(sel: &Selection) -> bool {
    sel.nodes().first().is_some_and(|node| {
        node.children()
            .into_iter()
            .any(|child| child.is_text() && !child.text().trim().is_empty())
    })
}

/// Element starts its own block.
#[must_use]
pub fn is_block(sel: &Selection) -> bool {
    dom::is_one_of_tags(sel, BLOCK_TAGS) || is_display_math(sel)
}

/// LaTeX source carried by a math container, if any.
///
/// Looks at `data-latex` on the element or a descendant, then a TeX
/// `annotation` (KaTeX and MathML keep one).
#[must_use]
pub fn latex_source(sel: &Selection) -> Option<String> {
    if let Some(latex) = dom::get_attribute(sel, "data-latex") {
        if !latex.trim().is_empty() {
            return Some(latex.trim().to_string());
        }
    }
    let holder = dom::query_selector(sel, "[data-latex]");
    if let Some(latex) = dom::get_attribute(&holder, "data-latex") {
        if !latex.trim().is_empty() {
            return Some(latex.trim().to_string());
        }
    }
    let annotation = dom::query_selector(sel, r#"annotation[encoding="application/x-tex"]"#);
    if annotation.exists() {
        let tex = dom::text_content(&annotation);
        if !tex.trim().is_empty() {
            return Some(tex.trim().to_string());
        }
    }
    None
}

/// Visible glyph text of a math container, ignoring the hidden MathML copy.
#[must_use]
pub fn rendered_math_text(sel: &Selection) -> String {
    let html_part = dom::query_selector(sel, ".katex-html");
    if html_part.exists() {
        return dom::normalized_text(&html_part);
    }
    dom::normalized_text(sel)
}
