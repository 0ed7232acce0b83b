//! Text sanitization.
//!
//! Everything the extractor reads from the page passes through here before
//! it becomes an item. Prose goes through [`sanitize`] (single line, script
//! noise rejected); code goes through [`sanitize_code`], which keeps line
//! structure and indentation.

use crate::patterns::{ENCODING_ARTIFACT, SCRIPT_MARKER, WHITESPACE_RUN};

/// Glyphs the page uses for bullets, folded to one marker.
const BULLET_GLYPHS: &[char] = &['●', '▪', '◦', '‣', '∙', '⁃'];

/// Zero-width and byte-order characters.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{FFFD}'];

/// Sanitize a prose fragment, keeping extended Unicode.
///
/// Returns an empty string when the fragment is injected page script.
///
/// ```rust
/// use rs_chat_export::sanitize::sanitize;
///
/// assert_eq!(sanitize("  Hello\n\n   world \u{200B}"), "Hello world");
/// assert_eq!(sanitize("window.__oai_logHTML()"), "");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    sanitize_with(raw, true)
}

/// Sanitize a prose fragment.
///
/// With `keep_extended_unicode` off, every character outside printable
/// ASCII becomes a space before whitespace is collapsed.
#[must_use]
pub fn sanitize_with(raw: &str, keep_extended_unicode: bool) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| map_char(c, keep_extended_unicode))
        .collect();
    let without_artifacts = ENCODING_ARTIFACT.replace_all(&mapped, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&without_artifacts, " ");
    let cleaned = collapsed.trim();

    // Checked on the cleaned form so a second pass sees the same text.
    if SCRIPT_MARKER.is_match(cleaned) {
        return String::new();
    }
    cleaned.to_string()
}

fn map_char(c: char, keep_extended_unicode: bool) -> char {
    if c.is_control() || INVISIBLE.contains(&c) {
        return ' ';
    }
    if BULLET_GLYPHS.contains(&c) {
        return if keep_extended_unicode { '•' } else { '-' };
    }
    if !keep_extended_unicode && !(c.is_ascii_graphic() || c == ' ') {
        return ' ';
    }
    c
}

/// Sanitize a code block: keeps newlines and leading indentation, drops
/// control bytes, normalizes line endings and strips trailing whitespace
/// per line and blank lines at both ends.
#[must_use]
pub fn sanitize_code(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized
        .split('\n')
        .map(|line| {
            let kept: String = line
                .chars()
                .filter(|c| *c == '\t' || !(c.is_control() || INVISIBLE.contains(c)))
                .map(|c| if c == '\u{00A0}' { ' ' } else { c })
                .collect();
            kept.trim_end().to_string()
        })
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Whether the text is nothing but a UI control label ("Copy", "Edit",
/// a bare language name, a model badge).
#[must_use]
pub fn is_control_label(text: &str) -> bool {
    use crate::patterns::{CONTROL_LABELS, LANGUAGE_NAMES, MODEL_BADGE};

    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return false;
    }
    CONTROL_LABELS.contains(&lowered.as_str())
        || LANGUAGE_NAMES.contains(&lowered.as_str())
        || MODEL_BADGE.is_match(&lowered)
}
