// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for rich-text documents.
//!
//! This module turns a [`Document`] back into markdown text, for example to
//! show the body of a remote comment in a terminal. The conversion is lossy:
//! rendering and then parsing again is not guaranteed to give back the same
//! document.
//!
//! # Output Format
//!
//! - Headings use `#` markers, shifted by [`RenderOptions::heading_offset`]
//! - Code blocks are fenced with three backticks and their language tag
//! - Bullet items use [`RenderOptions::bullet`]; ordered items are numbered
//!   from 1
//! - Marks become `**strong**`, `*em*`, `` `code` `` and `[text](href)`
//! - Blocks are separated by a blank line
//!
//! # Example
//!
//! ```
//! use md2richtext::document::{Block, Document, Inline, Mark};
//! use md2richtext::renderer::{render_document, RenderOptions};
//!
//! let doc = Document::new(vec![
//!     Block::Heading { level: 1, content: vec![Inline::plain("Notes")] },
//!     Block::Paragraph { content: vec![Inline::marked("done", Mark::Strong)] },
//! ]);
//!
//! let markdown = render_document(&doc, &RenderOptions::default());
//! assert_eq!(markdown, "# Notes\n\n**done**\n");
//! ```

use crate::document::{Block, Document, Inline, ListItem, Mark};
use std::fmt::Write;

/// Configuration options for markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of heading levels to shift (0-5).
    ///
    /// Levels are clamped to a maximum of 6 after shifting.
    pub heading_offset: u8,

    /// Marker used for bullet list items.
    pub bullet: char,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_offset: 0,
            bullet: '-',
        }
    }
}

/// Returns a markdown heading prefix with the given level and offset.
///
/// The heading level is clamped to a maximum of 6 (H6).
fn heading(level: u8, offset: u8) -> String {
    let actual = level.saturating_add(offset).min(6);
    "#".repeat(usize::from(actual))
}

/// Renders a document as markdown.
///
/// Empty paragraphs produce no output, so an empty document renders as an
/// empty string. Otherwise the output ends with a single newline.
#[must_use]
pub fn render_document(doc: &Document, opts: &RenderOptions) -> String {
    let mut out = String::new();

    for block in doc.content() {
        if matches!(block, Block::Paragraph { content } if content.is_empty()) {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        render_block(&mut out, block, opts);
    }

    out
}

fn render_block(out: &mut String, block: &Block, opts: &RenderOptions) {
    match block {
        Block::Heading { level, content } => {
            writeln!(
                out,
                "{} {}",
                heading(*level, opts.heading_offset),
                render_inlines(content)
            )
            .unwrap();
        }
        Block::CodeBlock { language, text } => {
            writeln!(out, "```{}", language.as_deref().unwrap_or_default()).unwrap();
            if !text.is_empty() {
                writeln!(out, "{text}").unwrap();
            }
            out.push_str("```\n");
        }
        Block::BulletList { items } => {
            for item in items {
                render_item(out, &opts.bullet.to_string(), item);
            }
        }
        Block::OrderedList { items } => {
            for (number, item) in (1..).zip(items) {
                render_item(out, &format!("{number}."), item);
            }
        }
        Block::Paragraph { content } => {
            writeln!(out, "{}", render_inlines(content)).unwrap();
        }
    }
}

fn render_item(out: &mut String, marker: &str, item: &ListItem) {
    writeln!(out, "{marker} {}", render_inlines(&item.content)).unwrap();
}

fn render_inlines(runs: &[Inline]) -> String {
    runs.iter().map(render_inline).collect()
}

/// Renders one run, applying its marks innermost first.
fn render_inline(run: &Inline) -> String {
    run.marks()
        .iter()
        .fold(run.text().to_owned(), |text, mark| match mark {
            Mark::Strong => format!("**{text}**"),
            Mark::Em => format!("*{text}*"),
            Mark::Code => format!("`{}`", escape_for_inline_code(&text)),
            Mark::Link { href } => format!("[{text}]({href})"),
        })
}

/// Escapes backticks in a string for use inside inline code spans.
///
/// Replaces backticks with single quotes to avoid breaking the inline code
/// syntax.
fn escape_for_inline_code(s: &str) -> String {
    s.replace('`', "'")
}
