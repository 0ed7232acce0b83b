//! DOM read adapter.
//!
//! Thin functions over the `dom_query` crate giving the extractor a small,
//! read-only vocabulary: tag names, class tokens, attributes, text, and
//! ancestor walks. Every lookup returns an empty/`None` result on missing
//! data.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

// === Parsing ===

/// Parse an HTML page snapshot into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check if attribute exists
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Whitespace-separated class tokens of the first node.
#[must_use]
pub fn class_tokens(sel: &Selection) -> Vec<String> {
    sel.attr("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Whether the class attribute contains `token` as a whole token.
#[must_use]
pub fn has_class_token(sel: &Selection, token: &str) -> bool {
    sel.attr("class")
        .is_some_and(|c| c.split_whitespace().any(|t| t == token))
}

/// Whether the class attribute contains `fragment` anywhere (like `[class*=...]`).
#[must_use]
pub fn class_contains(sel: &Selection, fragment: &str) -> bool {
    sel.attr("class").is_some_and(|c| c.contains(fragment))
}

/// Parse a numeric attribute, ignoring a trailing `px`.
#[must_use]
pub fn numeric_attribute(sel: &Selection, name: &str) -> Option<f64> {
    let raw = sel.attr(name)?;
    raw.trim().trim_end_matches("px").trim().parse::<f64>().ok()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Check the tag name of the first node.
#[must_use]
pub fn is_tag(sel: &Selection, tag: &str) -> bool {
    tag_name(sel).is_some_and(|t| t == tag)
}

/// Check the tag name against several candidates.
#[must_use]
pub fn is_one_of_tags(sel: &Selection, tags: &[&str]) -> bool {
    tag_name(sel).is_some_and(|t| tags.contains(&t.as_str()))
}

/// Id of the first node in the selection.
#[inline]
#[must_use]
pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing. Use `.to_string()` only when
/// you need owned storage.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Text content with surrounding whitespace trimmed and inner runs collapsed.
#[must_use]
pub fn normalized_text(sel: &Selection) -> String {
    sel.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

// === Tree Navigation ===

/// Get parent element
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Element ancestors, nearest first.
#[must_use]
pub fn ancestors<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    let mut current = sel.nodes().first().and_then(NodeRef::parent);
    while let Some(node) = current {
        if node.is_element() {
            out.push(Selection::from(node));
        }
        current = node.parent();
    }
    out
}

/// Nearest element (self first, then ancestors) satisfying `pred`.
#[must_use]
pub fn closest<'a>(sel: &Selection<'a>, pred: impl Fn(&Selection<'a>) -> bool) -> Option<Selection<'a>> {
    if pred(sel) {
        return Some(sel.clone());
    }
    ancestors(sel).into_iter().find(|a| pred(a))
}

// === Querying ===

/// Query single element by CSS selector
#[inline]
#[must_use]
pub fn query_selector<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select_single(selector)
}

/// Query all elements by CSS selector
#[inline]
#[must_use]
pub fn query_selector_all<'a>(sel: &Selection<'a>, selector: &str) -> Selection<'a> {
    sel.select(selector)
}

/// All element descendants in document (pre-order) order, as selections.
#[must_use]
pub fn descendant_elements<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.select("*").nodes().iter().map(|n| Selection::from(*n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_attributes() {
        let doc = parse(r#"<div id="main" class="group w-full" data-top="120px">content</div>"#);
        let div = doc.select("div");

        assert_eq!(get_attribute(&div, "id"), Some("main".to_string()));
        assert!(has_attribute(&div, "data-top"));
        assert_eq!(numeric_attribute(&div, "data-top"), Some(120.0));
        assert_eq!(class_tokens(&div), vec!["group".to_string(), "w-full".to_string()]);
    }

    #[test]
    fn test_class_token_vs_fragment() {
        let doc = parse(r#"<div class="dark:bg-gray-800 min-h-[20px]">x</div>"#);
        let div = doc.select("div");

        assert!(has_class_token(&div, "dark:bg-gray-800"));
        assert!(!has_class_token(&div, "min-h"));
        assert!(class_contains(&div, "min-h-"));
    }

    #[test]
    fn test_missing_attributes_return_none() {
        let doc = parse("<div>no attributes</div>");
        let div = doc.select("div");

        assert_eq!(get_attribute(&div, "data-test"), None);
        assert_eq!(numeric_attribute(&div, "width"), None);
        assert!(class_tokens(&div).is_empty());
        assert!(!has_class_token(&div, "x"));
    }

    #[test]
    fn test_tag_name_and_checks() {
        let doc = parse("<article><section><pre>x</pre></section></article>");

        assert_eq!(tag_name(&doc.select("section")), Some("section".to_string()));
        assert!(is_tag(&doc.select("pre"), "pre"));
        assert!(is_one_of_tags(&doc.select("article"), &["main", "article"]));
        assert_eq!(tag_name(&doc.select("span")), None);
    }

    #[test]
    fn test_ancestors_and_closest() {
        let doc = parse(r#"<div data-message-author-role="user"><section><p id="t">hi</p></section></div>"#);
        let p = doc.select("#t");

        let tags: Vec<_> = ancestors(&p).iter().filter_map(tag_name).collect();
        assert_eq!(&tags[..3], &["section", "div", "body"]);

        let role = closest(&p, |s| has_attribute(s, "data-message-author-role"));
        assert!(role.is_some());
        assert!(closest(&p, |s| is_tag(s, "table")).is_none());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = parse(r#"<div id="r"><section><p id="a">1</p></section><p id="b">2</p></div>"#);
        let ids: Vec<_> = descendant_elements(&doc.select("#r"))
            .iter()
            .filter_map(|s| get_attribute(s, "id"))
            .collect();

        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_normalized_text() {
        let doc = parse("<p>  hello \n\n   world  </p>");
        assert_eq!(normalized_text(&doc.select("p")), "hello world");
        assert_eq!(text_content(&doc.select("span")), "".into());
    }
}
