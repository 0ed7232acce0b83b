//! Page snapshot decoding.
//!
//! Saved chat pages arrive as bytes. They are decoded to UTF-8 from a byte
//! order mark, else from the `charset` of a `<meta>` tag near the top of
//! the document, else as UTF-8.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

/// Bytes scanned for a charset declaration.
pub const SNIFF_LEN: usize = 4096;

/// `charset=` inside a `<meta>` tag, covering both `<meta charset>` and
/// the http-equiv `content="text/html; charset=..."` form.
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?([A-Za-z0-9._:-]+)"#).expect("META_CHARSET regex")
});

/// A decoded page snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    /// Name of the encoding used.
    pub encoding: &'static str,
    /// Whether malformed sequences were replaced.
    pub had_errors: bool,
}

/// Charset label declared by a `<meta>` tag in the document head.
#[must_use]
pub fn declared_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Encoding for a snapshot: BOM, then declared charset, then UTF-8.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    declared_charset(bytes)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode a snapshot to UTF-8, replacing malformed sequences.
#[must_use]
pub fn decode_snapshot(bytes: &[u8]) -> DecodedPage {
    let encoding = sniff_encoding(bytes);
    let (html, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "snapshot had malformed sequences");
    }
    DecodedPage { html: html.into_owned(), encoding: used.name(), had_errors }
}
