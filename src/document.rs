// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Rich-text document model and its wire JSON encoding.
//!
//! A [`Document`] is the tree handed to a remote "create/update rich-text
//! field" call. Its JSON shape is fixed by the consuming API, so encoding is
//! written out by hand rather than derived wherever the Rust layout differs
//! from the wire layout (node attributes live under `attrs`, list items wrap
//! a paragraph, code blocks wrap a text node).
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "type": "doc",
//!   "version": 1,
//!   "content": [
//!     { "type": "heading", "attrs": { "level": 1 },
//!       "content": [{ "type": "text", "text": "Title" }] },
//!     { "type": "paragraph",
//!       "content": [{ "type": "text", "text": "bold", "marks": [{ "type": "strong" }] }] }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use md2richtext::document::{parse_document, Block, Document, Inline};
//!
//! let doc = Document::new(vec![Block::Paragraph {
//!     content: vec![Inline::plain("Hello")],
//! }]);
//!
//! let json = serde_json::to_string(&doc).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"type":"doc","version":1,"content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#
//! );
//! assert_eq!(parse_document(&json).unwrap(), doc);
//! ```

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use snafu::prelude::*;

/// Error type for document JSON decoding failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// The JSON was malformed or did not match the document schema.
    #[snafu(display("failed to parse document JSON: {source}"))]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// The root of a rich-text document.
///
/// The content is never empty: a document built from zero blocks holds a
/// single empty paragraph instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content: Vec<Block>,
}

impl Document {
    /// The node type tag of the root.
    pub const KIND: &'static str = "doc";

    /// The only schema version this crate reads and writes.
    pub const VERSION: u64 = 1;

    /// Creates a document from top-level blocks.
    ///
    /// An empty block list yields [`Document::empty`].
    #[must_use]
    pub fn new(content: Vec<Block>) -> Self {
        if content.is_empty() {
            Self::empty()
        } else {
            Self { content }
        }
    }

    /// Creates a document holding one empty paragraph.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content: vec![Block::Paragraph {
                content: Vec::new(),
            }],
        }
    }

    /// Returns the top-level blocks.
    #[must_use]
    pub const fn content(&self) -> &[Block] {
        self.content.as_slice()
    }

    /// Consumes the document, returning its top-level blocks.
    #[must_use]
    pub fn into_content(self) -> Vec<Block> {
        self.content
    }
}

/// A top-level structural node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A heading line.
    Heading {
        /// Heading level, always in `1..=6`.
        level: u8,
        /// Inline runs of the heading text.
        content: Vec<Inline>,
    },

    /// A fenced code block.
    CodeBlock {
        /// Language tag from the opening fence, if any.
        language: Option<String>,
        /// The raw body, lines joined with `\n`.
        text: String,
    },

    /// An unordered list.
    BulletList {
        /// The list items, in source order.
        items: Vec<ListItem>,
    },

    /// An ordered list.
    OrderedList {
        /// The list items, in source order.
        items: Vec<ListItem>,
    },

    /// A paragraph of inline runs.
    Paragraph {
        /// Inline runs of the paragraph.
        content: Vec<Inline>,
    },
}

impl Block {
    const TYPES: &'static [&'static str] = &[
        "heading",
        "codeBlock",
        "bulletList",
        "orderedList",
        "paragraph",
    ];

    /// Returns the wire type tag of this block.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::CodeBlock { .. } => "codeBlock",
            Self::BulletList { .. } => "bulletList",
            Self::OrderedList { .. } => "orderedList",
            Self::Paragraph { .. } => "paragraph",
        }
    }
}

/// A list entry holding exactly one paragraph.
///
/// Only the paragraph's inline runs are stored; the wrapping paragraph node
/// is added on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Inline runs of the item's paragraph.
    pub content: Vec<Inline>,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    /// A run of text sharing the same marks.
    Text {
        /// The run's text.
        text: String,
        /// Formatting marks; omitted on the wire when empty.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

impl Inline {
    /// Creates an unformatted text run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Creates a text run carrying a single mark.
    #[must_use]
    pub fn marked(text: impl Into<String>, mark: Mark) -> Self {
        Self::Text {
            text: text.into(),
            marks: vec![mark],
        }
    }

    /// Returns the run's text.
    #[must_use]
    pub fn text(&self) -> &str {
        let Self::Text { text, .. } = self;
        text
    }

    /// Returns the run's marks.
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        let Self::Text { marks, .. } = self;
        marks
    }
}

/// A formatting attribute attached to a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "attrs", rename_all = "camelCase")]
pub enum Mark {
    /// Bold text.
    Strong,
    /// Italic text.
    Em,
    /// Inline code.
    Code,
    /// A hyperlink.
    Link {
        /// The link target.
        href: String,
    },
}

#[derive(Serialize)]
struct HeadingAttrs {
    level: u8,
}

#[derive(Serialize)]
struct CodeBlockAttrs<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

/// Borrowed paragraph node wrapping a list item's runs.
struct ParagraphNode<'a>(&'a [Inline]);

impl Serialize for ParagraphNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "paragraph")?;
        map.serialize_entry("content", self.0)?;
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", Self::KIND)?;
        map.serialize_entry("version", &Self::VERSION)?;
        map.serialize_entry("content", &self.content)?;
        map.end()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        match self {
            Self::Heading { level, content } => {
                map.serialize_entry("attrs", &HeadingAttrs { level: *level })?;
                map.serialize_entry("content", content)?;
            }
            Self::CodeBlock { language, text } => {
                let attrs = CodeBlockAttrs {
                    language: language.as_deref(),
                };
                map.serialize_entry("attrs", &attrs)?;
                map.serialize_entry("content", &[Inline::plain(text.as_str())])?;
            }
            Self::BulletList { items } | Self::OrderedList { items } => {
                map.serialize_entry("content", items)?;
            }
            Self::Paragraph { content } => {
                map.serialize_entry("content", content)?;
            }
        }
        map.end()
    }
}

impl Serialize for ListItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "listItem")?;
        map.serialize_entry("content", &[ParagraphNode(&self.content)])?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        expect_type::<D::Error>(&value, Self::KIND)?;

        match value.get("version").and_then(Value::as_u64) {
            Some(Self::VERSION) => {}
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "unsupported document version {other}"
                )));
            }
            None => return Err(D::Error::missing_field("version")),
        }

        Ok(Self::new(children::<_, D::Error>(&value)?))
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = get_str(&value, &["type"]).ok_or_else(|| D::Error::missing_field("type"))?;

        Ok(match kind {
            "heading" => {
                let raw = get_u64(&value, &["attrs", "level"])
                    .ok_or_else(|| D::Error::missing_field("level"))?;
                let level = u8::try_from(raw)
                    .ok()
                    .filter(|level| (1..=6).contains(level))
                    .ok_or_else(|| {
                        D::Error::custom(format!("heading level must be 1-6, got {raw}"))
                    })?;
                Self::Heading {
                    level,
                    content: children::<_, D::Error>(&value)?,
                }
            }
            "codeBlock" => {
                let language = get_str(&value, &["attrs", "language"])
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_owned);
                let text = children::<Inline, D::Error>(&value)?
                    .iter()
                    .map(Inline::text)
                    .collect();
                Self::CodeBlock { language, text }
            }
            "bulletList" => Self::BulletList {
                items: children::<_, D::Error>(&value)?,
            },
            "orderedList" => Self::OrderedList {
                items: children::<_, D::Error>(&value)?,
            },
            "paragraph" => Self::Paragraph {
                content: children::<_, D::Error>(&value)?,
            },
            other => return Err(D::Error::unknown_variant(other, Self::TYPES)),
        })
    }
}

impl<'de> Deserialize<'de> for ListItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        expect_type::<D::Error>(&value, "listItem")?;

        match <[Block; 1]>::try_from(children::<Block, D::Error>(&value)?) {
            Ok([Block::Paragraph { content }]) => Ok(Self { content }),
            _ => Err(D::Error::custom(
                "list item must hold exactly one paragraph",
            )),
        }
    }
}

/// Checks that a node carries the expected `type` tag.
fn expect_type<E: serde::de::Error>(value: &Value, expected: &'static str) -> Result<(), E> {
    match get_str(value, &["type"]) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(E::invalid_value(Unexpected::Str(kind), &expected)),
        None => Err(E::missing_field("type")),
    }
}

/// Decodes a node's `content` array; a missing array decodes as empty.
fn children<T, E>(value: &Value) -> Result<Vec<T>, E>
where
    T: DeserializeOwned,
    E: serde::de::Error,
{
    match value.get("content") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(content) => Vec::<T>::deserialize(content).map_err(E::custom),
    }
}

/// Navigates a JSON path and returns the string value at the end.
fn get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)?.as_str()
}

/// Navigates a JSON path and returns the unsigned integer at the end.
fn get_u64(value: &Value, path: &[&str]) -> Option<u64> {
    lookup(value, path)?.as_u64()
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    Some(current)
}

/// Parses document JSON into a [`Document`].
///
/// # Errors
///
/// Returns an error if the JSON is malformed or does not follow the
/// document schema (unknown node types, heading levels outside 1-6,
/// a version other than 1, or list items without exactly one paragraph).
///
/// # Example
///
/// ```
/// use md2richtext::document::parse_document;
///
/// let doc = parse_document(r#"{"type":"doc","version":1,"content":[]}"#).unwrap();
/// assert_eq!(doc.content().len(), 1);
/// ```
pub fn parse_document(json: &str) -> Result<Document, ParseError> {
    serde_json::from_str(json).context(JsonSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn to_value(doc: &Document) -> Value {
        serde_json::to_value(doc).unwrap()
    }

    fn sample_document() -> Document {
        Document::new(vec![
            Block::Heading {
                level: 2,
                content: vec![Inline::plain("Notes")],
            },
            Block::CodeBlock {
                language: Some("rust".into()),
                text: "fn main() {}\n\nmain();".into(),
            },
            Block::BulletList {
                items: vec![
                    ListItem {
                        content: vec![Inline::marked("one", Mark::Strong)],
                    },
                    ListItem {
                        content: vec![Inline::plain("two")],
                    },
                ],
            },
            Block::OrderedList {
                items: vec![ListItem {
                    content: vec![Inline::marked("step", Mark::Code)],
                }],
            },
            Block::Paragraph {
                content: vec![
                    Inline::plain("see "),
                    Inline::marked(
                        "docs",
                        Mark::Link {
                            href: "https://example.com".into(),
                        },
                    ),
                ],
            },
        ])
    }

    #[test]
    fn empty_block_list_becomes_empty_paragraph() {
        let doc = Document::new(Vec::new());

        assert_eq!(doc, Document::empty());
        assert_eq!(
            to_value(&doc),
            json!({
                "type": "doc",
                "version": 1,
                "content": [{ "type": "paragraph", "content": [] }]
            })
        );
    }

    #[test]
    fn serializes_heading() {
        let doc = Document::new(vec![Block::Heading {
            level: 3,
            content: vec![Inline::plain("Title")],
        }]);

        assert_eq!(
            to_value(&doc)["content"][0],
            json!({
                "type": "heading",
                "attrs": { "level": 3 },
                "content": [{ "type": "text", "text": "Title" }]
            })
        );
    }

    #[test]
    fn serializes_code_block_with_language() {
        let doc = Document::new(vec![Block::CodeBlock {
            language: Some("javascript".into()),
            text: "const x = 1;".into(),
        }]);

        assert_eq!(
            to_value(&doc)["content"][0],
            json!({
                "type": "codeBlock",
                "attrs": { "language": "javascript" },
                "content": [{ "type": "text", "text": "const x = 1;" }]
            })
        );
    }

    #[test]
    fn serializes_code_block_without_language_as_empty_attrs() {
        let doc = Document::new(vec![Block::CodeBlock {
            language: None,
            text: "ls".into(),
        }]);

        assert_eq!(
            to_value(&doc)["content"][0],
            json!({
                "type": "codeBlock",
                "attrs": {},
                "content": [{ "type": "text", "text": "ls" }]
            })
        );
    }

    #[test]
    fn serializes_list_items_wrapped_in_paragraphs() {
        let doc = Document::new(vec![Block::OrderedList {
            items: vec![ListItem {
                content: vec![Inline::plain("first")],
            }],
        }]);

        assert_eq!(
            to_value(&doc)["content"][0],
            json!({
                "type": "orderedList",
                "content": [{
                    "type": "listItem",
                    "content": [{
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": "first" }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn serializes_marks() {
        let doc = Document::new(vec![Block::Paragraph {
            content: vec![
                Inline::marked("b", Mark::Strong),
                Inline::marked("i", Mark::Em),
                Inline::marked("c", Mark::Code),
                Inline::marked("l", Mark::Link { href: "url".into() }),
            ],
        }]);

        assert_eq!(
            to_value(&doc)["content"][0]["content"],
            json!([
                { "type": "text", "text": "b", "marks": [{ "type": "strong" }] },
                { "type": "text", "text": "i", "marks": [{ "type": "em" }] },
                { "type": "text", "text": "c", "marks": [{ "type": "code" }] },
                {
                    "type": "text",
                    "text": "l",
                    "marks": [{ "type": "link", "attrs": { "href": "url" } }]
                }
            ])
        );
    }

    #[test]
    fn serializes_type_first() {
        let json = serde_json::to_string(&Document::empty()).unwrap();

        assert!(json.starts_with(r#"{"type":"doc","version":1,"#));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let doc = sample_document();
        let json = serde_json::to_string(&doc).unwrap();

        assert_eq!(parse_document(&json).unwrap(), doc);
    }

    #[test]
    fn decodes_missing_content_as_empty() {
        let doc = parse_document(
            r#"{"type":"doc","version":1,"content":[{"type":"paragraph"}]}"#,
        )
        .unwrap();

        assert_eq!(doc, Document::empty());
    }

    #[test]
    fn decodes_empty_language_as_none() {
        let doc = parse_document(
            r#"{"type":"doc","version":1,"content":[
                {"type":"codeBlock","attrs":{"language":""},"content":[{"type":"text","text":"x"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            doc.content(),
            [Block::CodeBlock {
                language: None,
                text: "x".into()
            }]
        );
    }

    #[test]
    fn rejects_unknown_block_type() {
        let err = parse_document(
            r#"{"type":"doc","version":1,"content":[{"type":"table","content":[]}]}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("table"), "{err}");
    }

    #[test]
    fn rejects_heading_level_out_of_range() {
        let err = parse_document(
            r#"{"type":"doc","version":1,"content":[{"type":"heading","attrs":{"level":7}}]}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("1-6"), "{err}");
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = parse_document(r#"{"type":"doc","version":2,"content":[]}"#).unwrap_err();

        assert!(err.to_string().contains("version 2"), "{err}");
    }

    #[test]
    fn rejects_wrong_root_type() {
        assert!(parse_document(r#"{"type":"paragraph","version":1}"#).is_err());
    }

    #[test]
    fn rejects_list_item_with_two_paragraphs() {
        let err = parse_document(
            r#"{"type":"doc","version":1,"content":[{"type":"bulletList","content":[
                {"type":"listItem","content":[
                    {"type":"paragraph","content":[]},
                    {"type":"paragraph","content":[]}
                ]}
            ]}]}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("exactly one paragraph"), "{err}");
    }

    #[test]
    fn rejects_unknown_mark() {
        let result = parse_document(
            r#"{"type":"doc","version":1,"content":[{"type":"paragraph","content":[
                {"type":"text","text":"x","marks":[{"type":"underline"}]}
            ]}]}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn returns_error_for_invalid_json() {
        assert!(parse_document("not json").is_err());
    }
}
