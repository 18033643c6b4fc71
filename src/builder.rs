// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Document assembly from caller-supplied text.
//!
//! Text is interpreted either as markdown or as plain text, selected by
//! [`TextFormat`]. Both paths always produce a well-formed [`Document`].

use crate::document::{Block, Document, Inline};
use crate::markdown::{self, lines};

/// How input text should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// Parse headings, code fences, lists and inline marks.
    #[default]
    Markdown,
    /// Take each non-empty line literally as one paragraph.
    PlainText,
}

impl TextFormat {
    /// Maps a "text is markdown" flag to a format.
    #[must_use]
    pub const fn from_markdown_flag(markdown: bool) -> Self {
        if markdown {
            Self::Markdown
        } else {
            Self::PlainText
        }
    }
}

/// Builds a document from text in the given format.
///
/// # Example
///
/// ```
/// use md2richtext::{convert, TextFormat};
///
/// let doc = convert("**hi**", TextFormat::PlainText);
/// let json = serde_json::to_value(&doc).unwrap();
/// assert_eq!(json["content"][0]["content"][0]["text"], "**hi**");
/// ```
#[must_use]
pub fn convert(text: &str, format: TextFormat) -> Document {
    match format {
        TextFormat::Markdown => from_markdown(text),
        TextFormat::PlainText => from_plain_text(text),
    }
}

/// Builds a document by parsing markdown.
#[must_use]
pub fn from_markdown(text: &str) -> Document {
    let blocks = markdown::parse_blocks(text);
    log::debug!(
        "converted {} bytes of markdown into {} blocks",
        text.len(),
        blocks.len()
    );
    Document::new(blocks)
}

/// Builds a document with one unformatted paragraph per non-blank line.
///
/// Lines are kept as they are; no markdown syntax is recognized.
#[must_use]
pub fn from_plain_text(text: &str) -> Document {
    let blocks: Vec<Block> = lines(text)
        .filter(|line| !line.trim().is_empty())
        .map(|line| Block::Paragraph {
            content: vec![Inline::plain(line)],
        })
        .collect();
    log::debug!(
        "converted {} bytes of plain text into {} paragraphs",
        text.len(),
        blocks.len()
    );
    Document::new(blocks)
}
