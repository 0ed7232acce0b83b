//! Equation normalization.
//!
//! Two pure string transforms over captured math:
//!
//! - [`normalize`] builds the dedup key, so restatements of one formula
//!   (`F=ma`, `F = m * a`, `F: m×a`) collapse to a single key.
//! - [`format`] turns LaTeX-ish source into readable plain text with
//!   Unicode glyphs for the layout engine.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `\frac{a}{b}` with brace-free arguments.
static FRAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[dt]?frac\s*\{([^{}]*)\}\s*\{([^{}]*)\}").expect("FRAC regex")
});

/// `\sqrt{x}` with a brace-free argument.
static SQRT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\sqrt\s*\{([^{}]*)\}").expect("SQRT regex"));

/// Any remaining LaTeX command.
static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([A-Za-z]+)").expect("COMMAND regex"));

/// LaTeX spacing and line-break commands.
static SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[,;:! ]|\\\\|~").expect("SPACING regex"));

/// Runs of `=` and `:` used as relation signs.
static RELATION_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[=:]+").expect("RELATION_RUN regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE regex"));

/// Macro name to display glyph.
const GLYPHS: &[(&str, &str)] = &[
    ("alpha", "α"), ("beta", "β"), ("gamma", "γ"), ("delta", "δ"), ("epsilon", "ε"),
    ("varepsilon", "ε"), ("zeta", "ζ"), ("eta", "η"), ("theta", "θ"), ("lambda", "λ"),
    ("mu", "μ"), ("nu", "ν"), ("xi", "ξ"), ("pi", "π"), ("rho", "ρ"), ("sigma", "σ"),
    ("tau", "τ"), ("phi", "φ"), ("varphi", "φ"), ("chi", "χ"), ("psi", "ψ"), ("omega", "ω"),
    ("Gamma", "Γ"), ("Delta", "Δ"), ("Theta", "Θ"), ("Lambda", "Λ"), ("Pi", "Π"),
    ("Sigma", "Σ"), ("Phi", "Φ"), ("Psi", "Ψ"), ("Omega", "Ω"),
    ("infty", "∞"), ("times", "×"), ("cdot", "·"), ("div", "÷"), ("pm", "±"), ("mp", "∓"),
    ("approx", "≈"), ("neq", "≠"), ("ne", "≠"), ("geq", "≥"), ("ge", "≥"), ("leq", "≤"),
    ("le", "≤"), ("equiv", "≡"), ("propto", "∝"), ("partial", "∂"), ("nabla", "∇"),
    ("sum", "∑"), ("prod", "∏"), ("int", "∫"), ("oint", "∮"), ("to", "→"),
    ("rightarrow", "→"), ("Rightarrow", "⇒"), ("leftarrow", "←"), ("implies", "⇒"),
    ("in", "∈"), ("forall", "∀"), ("exists", "∃"), ("cdots", "⋯"), ("ldots", "…"),
    ("degree", "°"),
];

/// Commands whose name is printed as-is (function names).
const FUNCTION_NAMES: &[&str] = &["sin", "cos", "tan", "log", "ln", "exp", "lim", "max", "min"];

/// Flattened phrases and alternative forms that state the same step of a
/// derivation, mapped to one canonical key fragment. Applied in order.
const CANONICAL_FORMS: &[(&str, &str)] = &[
    ("differentiatebothsideswithrespecttotime", "dp/dt=d(mv)/dt"),
    ("assumingmassmisconstant", "dp/dt=mdv/dt"),
    ("since=dv/dt=a", "f=ma"),
    ("dtdp", "dp/dt"),
    ("dtdv", "dv/dt"),
    ("d(mv)/dt=mdv/dt", "mdv/dt"),
];

/// Collapse runs of three or more identical ASCII letters to one letter.
///
/// Rendered math sometimes triples glyphs (`FFF=mmmaaa`).
fn collapse_repeated_letters(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        if c.is_ascii_alphabetic() && run >= 3 {
            out.push(c);
        } else {
            out.extend(std::iter::repeat_n(c, run));
        }
        i += run;
    }
    out
}

/// Rewrite `\frac` until no brace-free fraction remains.
fn flatten_fractions(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..8 {
        let next = FRAC.replace_all(&current, "($1)/($2)").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Drop parentheses around a single token: `(dp)/(dt)` -> `dp/dt`.
fn unwrap_simple_groups(input: &str) -> String {
    static SIMPLE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\(([A-Za-z0-9α-ωΑ-Ω.]+)\)").expect("SIMPLE_GROUP regex")
    });
    SIMPLE_GROUP.replace_all(input, "$1").into_owned()
}

/// Dedup key for an equation.
///
/// ```rust
/// use rs_chat_export::equation::normalize;
///
/// assert_eq!(normalize("F=ma"), normalize("F = m * a"));
/// assert_eq!(normalize(r"\frac{dp}{dt}"), normalize("dt dp"));
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let collapsed = collapse_repeated_letters(raw.trim());
    let flattened = unwrap_simple_groups(&flatten_fractions(&collapsed));
    let without_macros = COMMAND.replace_all(&flattened, |caps: &Captures| match &caps[1] {
        "left" | "right" | "cdot" | "times" | "quad" | "qquad" => String::new(),
        name => name.to_string(),
    });

    let mut key: String = without_macros
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | '*' | '×' | '·' | '\\'))
        .collect();
    key = RELATION_RUN.replace_all(&key, "=").into_owned();
    key = key.to_lowercase();

    for (form, canonical) in CANONICAL_FORMS {
        if key.contains(form) {
            key = key.replace(form, canonical);
        }
    }
    key
}

/// Display form of an equation.
///
/// ```rust
/// use rs_chat_export::equation::format;
///
/// assert_eq!(format(r"F = \frac{dp}{dt}"), "F = dp/dt");
/// assert_eq!(format(r"\alpha+\beta"), "α + β");
/// ```
#[must_use]
pub fn format(raw: &str) -> String {
    let mut text = SPACING.replace_all(raw.trim(), " ").into_owned();
    text = text.replace(r"\left", "").replace(r"\right", "");
    text = SQRT.replace_all(&text, "√($1)").into_owned();
    text = unwrap_simple_groups(&flatten_fractions(&text));
    text = COMMAND
        .replace_all(&text, |caps: &Captures| {
            let name = &caps[1];
            if let Some((_, glyph)) = GLYPHS.iter().find(|(macro_name, _)| *macro_name == name) {
                (*glyph).to_string()
            } else if FUNCTION_NAMES.contains(&name) {
                format!("{name} ")
            } else {
                String::new()
            }
        })
        .into_owned();
    text = text.replace(['{', '}'], "");
    space_operators(&text)
}

/// Put single spaces around binary operators; leave unary minus attached.
fn space_operators(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let op = match c {
            '*' => Some('×'),
            '+' | '-' | '×' | '÷' | '=' | '≈' | '≠' | '≤' | '≥' => Some(c),
            _ => None,
        };
        let Some(op) = op else {
            out.push(c);
            continue;
        };

        let previous = out.trim_end().chars().last();
        let unary = op == '-'
            && previous.is_none_or(|p| "(+-×÷=≈≠≤≥^_,[".contains(p));
        if unary {
            out.push(op);
        } else {
            let trimmed_len = out.trim_end().len();
            out.truncate(trimmed_len);
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(op);
            out.push(' ');
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
        }
    }

    WHITESPACE.replace_all(out.trim(), " ").into_owned()
}
