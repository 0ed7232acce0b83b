//! Compiled regex patterns and vocabularies shared by extraction, cleanup
//! and layout.
//!
//! All patterns are compiled once using `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// UI chrome
// =============================================================================

/// Language names that code-block chrome prints as a bare caption.
pub const LANGUAGE_NAMES: &[&str] = &[
    "java", "javascript", "js", "python", "typescript", "ts", "html", "css", "json", "xml",
    "yaml", "sql", "c", "c++", "c#", "cpp", "go", "ruby", "php", "rust", "swift", "kotlin",
    "shell", "bash", "sh", "powershell", "markdown", "plaintext", "text", "latex",
];

/// Control labels leaked from message and code-block toolbars.
pub const CONTROL_LABELS: &[&str] = &["copy", "edit", "copy edit", "copy code", "edit copy"];

/// Words that may make up a residual caption right after a code block.
pub const CAPTION_WORDS: &[&str] = &[
    "java", "copy", "edit", "code", "javascript", "python", "typescript",
];

/// Class tokens marking elements as decorative or hidden.
pub const DECORATIVE_CLASSES: &[&str] = &[
    "sr-only", "hidden", "invisible", "ui-control-ignore", "katex-mathml", "visually-hidden",
];

/// Model badge printed at the end of assistant turns ("4o", "o1" ...).
pub static MODEL_BADGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2}o|o\d)$").expect("MODEL_BADGE regex"));

// =============================================================================
// Text cleaning
// =============================================================================

/// Runs of whitespace.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Injected page-script noise: page globals and inline function literals.
pub static SCRIPT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:window|document|globalThis)\.[A-Za-z_$]|\bfunction\s*\(|\)\s*=>\s*\{|__oai|requestAnimationFrame|SSR_HTML|Date\.now\(\)",
    )
    .expect("SCRIPT_MARKER regex")
});

/// Corrupted encoding leftovers seen in captured text.
pub static ENCODING_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ø5Ü[0-9]|\u{FFFD}").expect("ENCODING_ARTIFACT regex"));

/// Leading speaker prefixes ("You said:", "ChatGPT:" ...).
pub static SPEAKER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:you|chatgpt|user|assistant)\s+said:|you:|user:|chatgpt:|assistant:)\s*")
        .expect("SPEAKER_PREFIX regex")
});

/// Inline back-references to a speaker.
pub static INLINE_SPEAKER_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:you said:|chatgpt said:|user said:|assistant said:|according to you:|as you mentioned:|you mentioned:|you asked:|as i mentioned:|i mentioned:|i said:|as previously mentioned:)\s*",
    )
    .expect("INLINE_SPEAKER_REFERENCE regex")
});

/// Trailing model badge ("... 4o"), separated from the text by whitespace.
pub static TRAILING_MODEL_BADGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:\d{1,2}o|o\d)\s*$").expect("TRAILING_MODEL_BADGE regex"));

// =============================================================================
// Lists and headings
// =============================================================================

/// Bullet list marker, capturing the extra indentation after it.
pub static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•*\-]\s(\s*)").expect("BULLET_MARKER regex"));

/// Numbered list marker, capturing the extra indentation after it.
pub static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s(\s*)").expect("NUMBERED_MARKER regex"));

/// One bullet point inside flattened text.
pub static BULLET_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[•]\s+([^•]+)").expect("BULLET_POINT regex"));

/// Separator in front of each numbered point inside flattened text.
pub static NUMBERED_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d+\.\s+").expect("NUMBERED_SPLIT regex"));

/// "1. Step One" / "Step 1:" shaped headings.
pub static STEP_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\d+\.\s+.{3,25}|step\s+\d+[:.])$").expect("STEP_HEADING regex")
});

/// Numbered section titles and "Doing the ..." headings.
pub static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[1-9]\d*\.\s+[A-Z]|[A-Z][a-z]+ing\s+the\b)").expect("SECTION_HEADING regex")
});

/// Section names that read as headings even without a trailing colon.
pub const SECTION_NAMES: &[&str] = &[
    "Constraints", "Requirements", "Solution", "Approach", "Algorithm", "Pseudocode",
    "Complexity Analysis", "Time Complexity", "Space Complexity", "Example", "Input",
    "Output", "Discussion", "Summary", "Conclusion", "Implementation", "Steps", "Overview",
    "Explanation", "Analysis", "Pros and Cons", "Advantages", "Disadvantages", "Key Points",
    "Notes", "References", "Further Reading", "Resources", "Mathematical Proof", "Derivation",
    "Methodology", "Where", "Mathematically", "Code", "Function", "Method", "Class",
    "Object", "Data Structure", "Variables", "Constants", "Parameters", "Return Value",
    "Imports", "Exports", "API", "Interface", "Problem Statement", "Objective", "Goal",
    "Background", "Context", "Result", "Evaluation", "Testing", "Debug", "Error Handling",
    "Edge Cases", "Optimizations", "Performance", "Alternatives", "Tradeoffs", "Use Case",
    "Scenario", "Recommendations", "Next Steps", "Status",
];

// =============================================================================
// Equations
// =============================================================================

/// LaTeX macros that only appear in math.
pub static LATEX_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:frac|int|sum|sqrt|alpha|beta|gamma|delta|partial|nabla|begin\{equation\})")
        .expect("LATEX_MACRO regex")
});

/// Well-known physics formulas as they appear in prose.
pub static PHYSICS_FORMULA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"F\s*=\s*m\s*\*?\s*a\b|E\s*=\s*m\s*c\^?2|\bp\s*=\s*m\s*\*?\s*v\b")
        .expect("PHYSICS_FORMULA regex")
});

/// Differential notation (`dp/dt`, flattened `dt dp`, `= m dv/dt`).
pub static DIFFERENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bd[a-z]\s*/\s*d[a-z]\b|\bdt\s+d[pv]\b|=\s*m\s*dv\s*/\s*dt")
        .expect("DIFFERENTIAL regex")
});

/// Short `lhs = rhs` statement made mostly of symbols.
pub static SYMBOLIC_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^=]{1,40}=[^=]{1,60}$").expect("SYMBOLIC_ASSIGNMENT regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_marker_matches_page_globals() {
        assert!(SCRIPT_MARKER.is_match("window.__oai_logHTML()"));
        assert!(SCRIPT_MARKER.is_match("(function () { x })"));
        assert!(SCRIPT_MARKER.is_match("document.getElementById"));
        assert!(!SCRIPT_MARKER.is_match("Open the window and the document"));
    }

    #[test]
    fn speaker_prefix_matches_variants() {
        assert_eq!(SPEAKER_PREFIX.replace("You said: hi", ""), "hi");
        assert_eq!(SPEAKER_PREFIX.replace("ChatGPT said:\nhello", ""), "hello");
        assert_eq!(SPEAKER_PREFIX.replace("Assistant: ok", ""), "ok");
        assert_eq!(SPEAKER_PREFIX.replace("Yourself: ok", ""), "Yourself: ok");
    }

    #[test]
    fn list_markers_capture_extra_indent() {
        let caps = BULLET_MARKER.captures("•     nested").unwrap();
        assert_eq!(caps[1].len(), 4);
        assert!(NUMBERED_MARKER.is_match("12. Twelfth"));
        assert!(!NUMBERED_MARKER.is_match("12.5 percent"));
    }

    #[test]
    fn equation_patterns() {
        assert!(PHYSICS_FORMULA.is_match("so F = m a holds"));
        assert!(PHYSICS_FORMULA.is_match("E=mc^2"));
        assert!(DIFFERENTIAL.is_match("F = dp/dt"));
        assert!(LATEX_MACRO.is_match(r"\frac{a}{b}"));
        assert!(!PHYSICS_FORMULA.is_match("Fermat"));
    }

    #[test]
    fn trailing_badge_needs_separation() {
        assert_eq!(TRAILING_MODEL_BADGE.replace("Here you go 4o", ""), "Here you go");
        assert_eq!(TRAILING_MODEL_BADGE.replace("Try GPT-4o", ""), "Try GPT-4o");
    }

    #[test]
    fn model_badge() {
        assert!(MODEL_BADGE.is_match("4o"));
        assert!(MODEL_BADGE.is_match("o1"));
        assert!(!MODEL_BADGE.is_match("go"));
    }
}
