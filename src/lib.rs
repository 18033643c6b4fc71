// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert markdown or plain text into rich-text document trees.
//!
//! Comment and description fields of issue trackers often take a structured
//! rich-text document instead of a string. This crate builds such a document
//! from text typed by a user, either by parsing a small markdown dialect or
//! by taking each line literally.
//!
//! # Overview
//!
//! 1. [`markdown`] splits the input into blocks (headings, fenced code,
//!    bullet and ordered lists, paragraphs)
//! 2. [`inline`] splits each line of text into runs carrying strong, em,
//!    code or link marks
//! 3. [`builder`] wraps the blocks into a [`Document`], or takes the
//!    plain-text path instead
//! 4. [`document`] encodes the result as the wire JSON expected by the
//!    consuming API
//!
//! Conversion never fails: input that does not match any construct is kept
//! as paragraph text.
//!
//! # Example
//!
//! ```
//! use md2richtext::{convert, TextFormat};
//!
//! let doc = convert("# Release\n\n- **fixed** the `parser`", TextFormat::Markdown);
//! let json = serde_json::to_value(&doc).unwrap();
//!
//! assert_eq!(json["type"], "doc");
//! assert_eq!(json["content"][0]["attrs"]["level"], 1);
//! assert_eq!(json["content"][1]["type"], "bulletList");
//! ```
//!
//! # Modules
//!
//! - [`builder`]: entry points selecting markdown or plain-text handling
//! - [`document`]: the document model and its JSON encoding
//! - [`inline`]: inline mark scanning
//! - [`markdown`]: block segmentation
//! - [`renderer`]: markdown rendering of existing documents

#![deny(missing_docs)]

pub mod builder;
pub mod document;
pub mod inline;
pub mod markdown;
pub mod renderer;

pub use builder::{TextFormat, convert, from_markdown, from_plain_text};
pub use document::{Block, Document, Inline, ListItem, Mark, ParseError, parse_document};
pub use renderer::{RenderOptions, render_document};
