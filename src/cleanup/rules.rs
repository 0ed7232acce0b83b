//! Cleanup rules: dedup keys, text reclassification, and the small
//! vocabularies that recognize headings and leaked UI captions.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::{
    BULLET_MARKER, CAPTION_WORDS, CONTROL_LABELS, DIFFERENTIAL, INLINE_SPEAKER_REFERENCE,
    LANGUAGE_NAMES, LATEX_MACRO, MODEL_BADGE, NUMBERED_MARKER, PHYSICS_FORMULA, SECTION_HEADING,
    SECTION_NAMES, SPEAKER_PREFIX, STEP_HEADING, SYMBOLIC_ASSIGNMENT, TRAILING_MODEL_BADGE,
    WHITESPACE_RUN,
};
use crate::result::ItemKind;

/// Longest text that may be reclassified as an equation.
pub const MAX_RECLASSIFY_LEN: usize = 160;

/// Longest text treated as a heading by shape alone.
pub const MAX_HEADING_LEN: usize = 60;

/// Most words in a section title recognized without a trailing colon.
pub const MAX_TITLE_WORDS: usize = 5;

static LIST_GLYPHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•*]\s*").expect("LIST_GLYPHS regex"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+").expect("LEADING_NUMBER regex"));

/// A text predicate paired with the kind it implies.
pub type TextRule = (fn(&str) -> bool, ItemKind);

/// Equation-shaped text, strongest signal first.
pub const RECLASSIFY_RULES: &[TextRule] = &[
    (has_latex_macro, ItemKind::Equation),
    (is_physics_formula, ItemKind::Equation),
    (is_differential, ItemKind::Equation),
    (is_symbolic_assignment, ItemKind::Equation),
];

fn has_latex_macro(text: &str) -> bool {
    LATEX_MACRO.is_match(text)
}

fn is_physics_formula(text: &str) -> bool {
    PHYSICS_FORMULA.is_match(text)
}

fn is_differential(text: &str) -> bool {
    DIFFERENTIAL.is_match(text)
}

/// `lhs = rhs` where no word is longer than three letters.
fn is_symbolic_assignment(text: &str) -> bool {
    SYMBOLIC_ASSIGNMENT.is_match(text)
        && !text
            .split(|c: char| !c.is_alphabetic())
            .any(|word| word.chars().count() > 3)
}

/// Kind implied by a text item's content: `Equation` when an equation rule
/// matches, `Text` otherwise.
#[must_use]
pub fn reclassify(text: &str) -> ItemKind {
    let body = strip_list_marker(text);
    if body.is_empty() || body.chars().count() > MAX_RECLASSIFY_LEN {
        return ItemKind::Text;
    }
    RECLASSIFY_RULES
        .iter()
        .find(|(rule, _)| rule(body))
        .map_or(ItemKind::Text, |(_, kind)| *kind)
}

/// Text without a leading `• ` / `N. ` list marker.
#[must_use]
pub fn strip_list_marker(text: &str) -> &str {
    let trimmed = text.trim();
    for marker in [&*BULLET_MARKER, &*NUMBERED_MARKER] {
        if let Some(m) = marker.find(trimmed) {
            return trimmed[m.end()..].trim_start();
        }
    }
    trimmed
}

/// Whether the text is a single bullet or numbered list entry.
#[must_use]
pub fn is_list_item(text: &str) -> bool {
    let trimmed = text.trim_start();
    BULLET_MARKER.is_match(trimmed) || NUMBERED_MARKER.is_match(trimmed)
}

/// Dedup key for text: whitespace collapsed, list glyphs and a leading
/// number removed, trailing colon dropped, lower-cased.
#[must_use]
pub fn text_key(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    let without_glyphs = LIST_GLYPHS.replace_all(&collapsed, "");
    let without_number = LEADING_NUMBER.replace(without_glyphs.trim(), "");
    without_number
        .trim_end()
        .trim_end_matches(':')
        .trim_end()
        .to_lowercase()
}

/// Dedup key for code: the lower-cased first `prefix_len` characters.
#[must_use]
pub fn code_key(content: &str, prefix_len: usize) -> String {
    content.trim().to_lowercase().chars().take(prefix_len).collect()
}

/// Heading-like text: colon-terminated and short, a known section name, or
/// a numbered/step heading.
#[must_use]
pub fn is_heading(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADING_LEN {
        return false;
    }
    if is_list_item(trimmed) && !STEP_HEADING.is_match(trimmed) {
        return false;
    }
    if trimmed.ends_with(':') {
        return true;
    }
    let stem = trimmed.trim_end_matches(':');
    SECTION_NAMES.iter().any(|name| name.eq_ignore_ascii_case(stem))
        || STEP_HEADING.is_match(trimmed)
        || (SECTION_HEADING.is_match(trimmed) && reads_as_title(trimmed))
}

/// A few words with no sentence punctuation.
fn reads_as_title(text: &str) -> bool {
    text.split_whitespace().count() <= MAX_TITLE_WORDS
        && !text.contains([',', ';'])
        && !text.ends_with(['.', '!', '?'])
}

/// 1-3 tokens, all from the code-block caption vocabulary.
#[must_use]
pub fn is_code_caption(text: &str) -> bool {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    (1..=3).contains(&words.len())
        && words.iter().all(|w| {
            CAPTION_WORDS.contains(&w.as_str())
                || LANGUAGE_NAMES.contains(&w.as_str())
                || CONTROL_LABELS.contains(&w.as_str())
                || MODEL_BADGE.is_match(w)
        })
}

/// Remove speaker prefixes, inline speaker back-references and a trailing
/// model badge. Leading indentation after a list marker is preserved.
#[must_use]
pub fn strip_speaker_prefixes(text: &str) -> String {
    let without_prefix = SPEAKER_PREFIX.replace(text, "");
    let without_refs = INLINE_SPEAKER_REFERENCE.replace_all(&without_prefix, "");
    let without_badge = TRAILING_MODEL_BADGE.replace(&without_refs, "");
    without_badge.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reclassify_equation_shapes() {
        assert_eq!(reclassify("F = m * a"), ItemKind::Equation);
        assert_eq!(reclassify("E=mc^2"), ItemKind::Equation);
        assert_eq!(reclassify("F = dp/dt"), ItemKind::Equation);
        assert_eq!(reclassify(r"\frac{1}{2} m v^2"), ItemKind::Equation);
        assert_eq!(reclassify("• p = m v"), ItemKind::Equation);
        assert_eq!(reclassify("x = 5"), ItemKind::Equation);
    }

    #[test]
    fn test_reclassify_leaves_prose() {
        assert_eq!(reclassify("The answer = forty two apples"), ItemKind::Text);
        assert_eq!(reclassify("Momentum is conserved in closed systems."), ItemKind::Text);
        let long = format!("F = ma {}", "and more words ".repeat(20));
        assert_eq!(reclassify(&long), ItemKind::Text);
    }

    #[test]
    fn test_text_key() {
        assert_eq!(text_key("• Steps:"), "steps");
        assert_eq!(text_key("2.  Mix   the batter"), "mix the batter");
        assert_eq!(text_key("Hello"), text_key("  hello "));
    }

    #[test]
    fn test_code_key_prefix() {
        let a = format!("{}tail one", "x".repeat(50));
        let b = format!("{}tail two", "X".repeat(50));
        assert_eq!(code_key(&a, 50), code_key(&b, 50));
        assert_ne!(code_key(&a, 60), code_key(&b, 60));
    }

    #[test]
    fn test_headings() {
        assert!(is_heading("Steps:"));
        assert!(is_heading("Time Complexity"));
        assert!(is_heading("Step 2:"));
        assert!(is_heading("1. Setup"));
        assert!(!is_heading("This is a normal sentence that happens to be somewhat long."));
        assert!(!is_heading("• an item"));
    }

    #[test]
    fn test_gerund_sentences_are_not_headings() {
        assert!(is_heading("Choosing the Right Pan"));
        assert!(is_heading("Heating the pan:"));
        assert!(!is_heading("Heating the pan slowly keeps it even."));
        assert!(!is_heading("Heating the pan slowly keeps it even"));
        assert!(!is_heading("Using the lid, cook it"));
    }

    #[test]
    fn test_code_captions() {
        assert!(is_code_caption("java"));
        assert!(is_code_caption("Copy Edit"));
        assert!(is_code_caption("python copy code"));
        assert!(!is_code_caption("copy the file"));
        assert!(!is_code_caption("java copy edit code"));
    }

    #[test]
    fn test_strip_speaker_prefixes() {
        assert_eq!(strip_speaker_prefixes("You said: What is F?"), "What is F?");
        assert_eq!(strip_speaker_prefixes("ChatGPT said:\nF is force"), "F is force");
        assert_eq!(strip_speaker_prefixes("As I mentioned: mass matters"), "mass matters");
        assert_eq!(strip_speaker_prefixes("Done 4o"), "Done");
        assert_eq!(strip_speaker_prefixes("•   nested"), "•   nested");
    }
}
