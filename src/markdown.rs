// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Block segmentation for the supported markdown dialect.
//!
//! Input is processed one line at a time. Each line is classified into a
//! [`LineKind`], and a small state machine groups consecutive lines into
//! blocks:
//!
//! | State          | Ends when                                  |
//! |----------------|--------------------------------------------|
//! | `Idle`         | n/a                                        |
//! | `InFence`      | a line starting with three backticks, or EOF |
//! | `InBulletRun`  | a line that is not a bullet item, or EOF   |
//! | `InOrderedRun` | a line that is not an ordered item, or EOF |
//!
//! Anything that is not a heading, fence or list item becomes a paragraph of
//! its own; consecutive text lines are not merged.
//!
//! # Example
//!
//! ```
//! use md2richtext::document::{Block, Inline};
//! use md2richtext::markdown::parse_blocks;
//!
//! let blocks = parse_blocks("# Title\n\nBody");
//! assert_eq!(
//!     blocks,
//!     vec![
//!         Block::Heading { level: 1, content: vec![Inline::plain("Title")] },
//!         Block::Paragraph { content: vec![Inline::plain("Body")] },
//!     ]
//! );
//! ```

use crate::document::{Block, ListItem};
use crate::inline;

const FENCE: &str = "```";

/// The classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// `#` to `######`, whitespace, then text.
    Heading {
        /// Number of leading `#` characters.
        level: u8,
        /// The heading text after the marker.
        text: &'a str,
    },
    /// Three backticks, optionally followed by a language tag.
    Fence {
        /// The trimmed language tag, if present.
        language: Option<&'a str>,
    },
    /// `*`, `-` or `+` (after optional indentation), whitespace, then text.
    Bullet {
        /// The item text after the marker.
        text: &'a str,
    },
    /// Digits, `.`, whitespace, then text.
    Ordered {
        /// The item text after the marker.
        text: &'a str,
    },
    /// Any other line.
    Paragraph {
        /// The whole line.
        text: &'a str,
    },
}

/// Line classifiers in priority order; the first match wins.
const CLASSIFIERS: [fn(&str) -> Option<LineKind<'_>>; 5] =
    [blank, heading, fence, bullet, ordered];

impl<'a> LineKind<'a> {
    /// Classifies one line (without its line terminator).
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        CLASSIFIERS
            .iter()
            .find_map(|classify| classify(line))
            .unwrap_or(Self::Paragraph { text: line })
    }
}

fn blank(line: &str) -> Option<LineKind<'_>> {
    line.trim().is_empty().then_some(LineKind::Blank)
}

fn heading(line: &str) -> Option<LineKind<'_>> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let text = marker_text(&line[hashes..])?;
    let level = u8::try_from(hashes).ok()?;
    Some(LineKind::Heading { level, text })
}

fn fence(line: &str) -> Option<LineKind<'_>> {
    let language = line.strip_prefix(FENCE)?.trim();
    Some(LineKind::Fence {
        language: (!language.is_empty()).then_some(language),
    })
}

fn bullet(line: &str) -> Option<LineKind<'_>> {
    let rest = line.trim_start().strip_prefix(['*', '-', '+'])?;
    marker_text(rest).map(|text| LineKind::Bullet { text })
}

fn ordered(line: &str) -> Option<LineKind<'_>> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    marker_text(rest).map(|text| LineKind::Ordered { text })
}

/// Returns the text following a list or heading marker.
///
/// The marker must be followed by at least one space or tab and then
/// non-empty text.
fn marker_text(rest: &str) -> Option<&str> {
    let text = rest.trim_start_matches([' ', '\t']);
    (text.len() < rest.len() && !text.is_empty()).then_some(text)
}

/// Splits text into lines on `\n`, dropping a trailing `\r` from each.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

#[derive(Debug, Default)]
enum State<'a> {
    #[default]
    Idle,
    InFence {
        language: Option<&'a str>,
        body: Vec<&'a str>,
    },
    InBulletRun(Vec<ListItem>),
    InOrderedRun(Vec<ListItem>),
}

/// Groups classified lines into blocks.
#[derive(Debug, Default)]
struct Segmenter<'a> {
    state: State<'a>,
    blocks: Vec<Block>,
}

impl<'a> Segmenter<'a> {
    fn feed(&mut self, line: &'a str) {
        self.state = match std::mem::take(&mut self.state) {
            State::Idle => self.start(LineKind::classify(line)),
            State::InFence {
                language,
                mut body,
            } => {
                if line.starts_with(FENCE) {
                    self.blocks.push(code_block(language, &body));
                    State::Idle
                } else {
                    body.push(line);
                    State::InFence { language, body }
                }
            }
            State::InBulletRun(mut items) => match LineKind::classify(line) {
                LineKind::Bullet { text } => {
                    items.push(list_item(text));
                    State::InBulletRun(items)
                }
                kind => {
                    self.blocks.push(Block::BulletList { items });
                    self.start(kind)
                }
            },
            State::InOrderedRun(mut items) => match LineKind::classify(line) {
                LineKind::Ordered { text } => {
                    items.push(list_item(text));
                    State::InOrderedRun(items)
                }
                kind => {
                    self.blocks.push(Block::OrderedList { items });
                    self.start(kind)
                }
            },
        };
    }

    /// Handles a line seen while idle, returning the next state.
    fn start(&mut self, kind: LineKind<'a>) -> State<'a> {
        log::trace!("block starts with {kind:?}");
        match kind {
            LineKind::Blank => State::Idle,
            LineKind::Heading { level, text } => {
                self.blocks.push(Block::Heading {
                    level,
                    content: inline::scan(text),
                });
                State::Idle
            }
            LineKind::Fence { language } => State::InFence {
                language,
                body: Vec::new(),
            },
            LineKind::Bullet { text } => State::InBulletRun(vec![list_item(text)]),
            LineKind::Ordered { text } => State::InOrderedRun(vec![list_item(text)]),
            LineKind::Paragraph { text } => {
                self.blocks.push(Block::Paragraph {
                    content: inline::scan(text),
                });
                State::Idle
            }
        }
    }

    /// Flushes any open block and returns the result.
    fn finish(mut self) -> Vec<Block> {
        match std::mem::take(&mut self.state) {
            State::Idle => {}
            State::InFence { language, body } => {
                log::debug!(
                    "code fence not closed before end of input ({} lines)",
                    body.len()
                );
                self.blocks.push(code_block(language, &body));
            }
            State::InBulletRun(items) => self.blocks.push(Block::BulletList { items }),
            State::InOrderedRun(items) => self.blocks.push(Block::OrderedList { items }),
        }

        if self.blocks.is_empty() {
            self.blocks.push(Block::Paragraph {
                content: Vec::new(),
            });
        }
        self.blocks
    }
}

fn code_block(language: Option<&str>, body: &[&str]) -> Block {
    Block::CodeBlock {
        language: language.map(str::to_owned),
        text: body.join("\n"),
    }
}

fn list_item(text: &str) -> ListItem {
    ListItem {
        content: inline::scan(text),
    }
}

/// Parses markdown into top-level blocks.
///
/// Never fails: anything that is not recognized becomes paragraph text. The
/// result is never empty; input with no blocks yields one empty paragraph.
#[must_use]
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut segmenter = Segmenter::default();
    for line in lines(markdown) {
        segmenter.feed(line);
    }
    segmenter.finish()
}
