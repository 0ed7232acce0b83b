//! Error types for rs-chat-export.
//!
//! Extraction and cleanup never fail from the caller's point of view; these
//! types cover the rendering surface, image loading, and the request channel.

use std::time::Duration;

/// Error type for export operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A canvas primitive failed in a way no fallback could absorb.
    #[error("Canvas failure: {0}")]
    Canvas(#[from] CanvasError),

    /// The conversation could not be serialized or deserialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request channel to the page endpoint failed.
    #[error("Channel failure: {0}")]
    Channel(#[from] ChannelError),

    /// A page endpoint reported that extraction failed.
    #[error("Extraction failed: {0}")]
    Extraction(String),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a document canvas primitive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The canvas does not provide this primitive (e.g. no grid-table plugin).
    #[error("canvas primitive not available: {0}")]
    Unsupported(&'static str),

    /// Font selection or text measurement failed.
    #[error("font error: {0}")]
    Font(String),

    /// A drawing operation failed.
    #[error("draw error: {0}")]
    Draw(String),

    /// The document could not be exported.
    #[error("export error: {0}")]
    Export(String),
}

/// Failure loading or decoding an image for embedding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageError {
    /// The load did not settle within the allotted time.
    #[error("image load timed out after {0:?}")]
    Timeout(Duration),

    /// The source is not readable from this context (tainted / cross-origin).
    #[error("image source is cross-origin: {0}")]
    CrossOrigin(String),

    /// The image bytes could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// No data is available for this source.
    #[error("image not found: {0}")]
    NotFound(String),
}

/// Failure talking to a page endpoint over a request channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The endpoint is gone; the request could not be delivered.
    #[error("channel disconnected: {0}")]
    Disconnected(String),

    /// The endpoint dropped the request without answering.
    #[error("no response from endpoint")]
    NoResponse,

    /// The endpoint did not answer in time.
    #[error("endpoint did not respond within {0:?}")]
    Timeout(Duration),
}
