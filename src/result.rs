//! Conversation data model.
//!
//! These are the values handed across the extraction/layout boundary. They
//! serialize to a plain JSON shape so a conversation can be carried between
//! contexts before it is rendered.

use serde::{Deserialize, Serialize};

/// Who produced a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Speaker by alternating turn position (even index = user).
    #[must_use]
    pub fn by_parity(index: usize) -> Self {
        if index % 2 == 0 {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

/// One classified content fragment within a message.
///
/// Every variant carries an optional `y`: the fragment's vertical position in
/// the page, used to restore visual reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    Code {
        content: String,
        #[serde(default)]
        language: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    Equation {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
        #[serde(default, rename = "isRendered", skip_serializing_if = "Option::is_none")]
        is_rendered: Option<bool>,
    },
    Table {
        #[serde(default)]
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
    Image {
        /// Data URL or source URL.
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
}

/// Discriminant of an `Item`, used by rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Code,
    Equation,
    Table,
    Image,
}

impl Item {
    /// Plain text item without position.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into(), y: None }
    }

    /// Equation item without position.
    #[must_use]
    pub fn equation(content: impl Into<String>) -> Self {
        Self::Equation { content: content.into(), y: None, is_rendered: None }
    }

    /// Code item without position.
    #[must_use]
    pub fn code(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Code { content: content.into(), language: language.into(), y: None }
    }

    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Text { .. } => ItemKind::Text,
            Self::Code { .. } => ItemKind::Code,
            Self::Equation { .. } => ItemKind::Equation,
            Self::Table { .. } => ItemKind::Table,
            Self::Image { .. } => ItemKind::Image,
        }
    }

    /// Vertical position, if known.
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        match self {
            Self::Text { y, .. }
            | Self::Code { y, .. }
            | Self::Equation { y, .. }
            | Self::Table { y, .. }
            | Self::Image { y, .. } => *y,
        }
    }

    pub fn set_y(&mut self, value: Option<f64>) {
        match self {
            Self::Text { y, .. }
            | Self::Code { y, .. }
            | Self::Equation { y, .. }
            | Self::Table { y, .. }
            | Self::Image { y, .. } => *y = value,
        }
    }

    /// Builder form of `set_y`.
    #[must_use]
    pub fn at(mut self, y: f64) -> Self {
        self.set_y(Some(y));
        self
    }

    /// Textual payload for text, code, equation and image items.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Text { content, .. }
            | Self::Code { content, .. }
            | Self::Equation { content, .. }
            | Self::Image { content, .. } => Some(content),
            Self::Table { .. } => None,
        }
    }

    /// True when the item carries nothing worth rendering.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Table { headers, rows, .. } => headers.is_empty() && rows.is_empty(),
            other => other.content().is_none_or(|c| c.trim().is_empty()),
        }
    }
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// The full extracted result: title plus ordered messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub title: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Serialize to the JSON transport shape.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the JSON transport shape.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of items across all messages.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.messages.iter().map(|m| m.items.len()).sum()
    }
}
