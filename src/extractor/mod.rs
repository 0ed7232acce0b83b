//! Message extraction.
//!
//! # Module Structure
//!
//! - `state`: per-container walk state (consumed nodes, positions)
//! - `speaker`: speaker attribution for a container
//! - `block`: the per-container DOM walk producing positioned items
//! - `conversation`: container location, duplicate guard, fallback message
//!
//! # Usage
//!
//! ```rust
//! use rs_chat_export::extractor::{extract_conversation, BlockExtractor};
//! use rs_chat_export::geometry::NoGeometry;
//! use rs_chat_export::{dom, Options};
//!
//! let doc = dom::parse(r#"<div data-message-author-role="user"><p>Hi</p></div>"#);
//! let opts = Options::default();
//!
//! let conversation = extract_conversation(&doc, &opts, &NoGeometry);
//! assert_eq!(conversation.messages.len(), 1);
//!
//! // Or one container at a time:
//! let items = BlockExtractor::new(&opts, &NoGeometry).extract(&doc.select("div"));
//! assert_eq!(items.len(), 1);
//! ```

pub mod block;
pub mod conversation;
pub mod speaker;
pub mod state;

pub use block::BlockExtractor;
pub use conversation::{extract_conversation, ConversationExtractor, EMPTY_PAGE_DIAGNOSTIC};
pub use speaker::SpeakerHint;
pub use state::ExtractionState;
