//! Normalized content blocks.
//!
//! Provider output is parsed into these blocks once, at the provider
//! boundary. Everything downstream (stores, API responses, renderers) works
//! with blocks and never sees the provider's markup.

use serde::{Deserialize, Serialize};

/// A structural unit of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Header { text: String },
    Paragraph { text: String },
    NumberedList { items: Vec<String> },
    BulletList { items: Vec<String> },
}

impl ContentBlock {
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    pub fn numbered<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NumberedList {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bullets<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::BulletList {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the block carries no visible text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Header { text } | Self::Paragraph { text } => text.trim().is_empty(),
            Self::NumberedList { items } | Self::BulletList { items } => {
                items.iter().all(|i| i.trim().is_empty())
            }
        }
    }

    /// Canonical plain-text rendering of a single block.
    pub fn to_text(&self) -> String {
        match self {
            Self::Header { text } | Self::Paragraph { text } => text.clone(),
            Self::NumberedList { items } => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {item}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::BulletList { items } => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Render a block sequence as plain text, blocks separated by a blank line.
pub fn render_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter(|b| !b.is_empty())
        .map(ContentBlock::to_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Total number of visible characters across a block sequence.
pub fn visible_chars(blocks: &[ContentBlock]) -> usize {
    blocks.iter().map(|b| b.to_text().chars().count()).sum()
}
