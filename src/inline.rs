// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Inline scanning: splits one line of text into formatted runs.
//!
//! The scanner walks the text left to right. At each position it tries, in
//! order, `**strong**`, `*em*`, `` `code` `` and `[text](href)`, each
//! anchored at the cursor. When none match, plain text is taken up to the
//! next `*`, backtick or `[`.
//!
//! Captured text is never scanned again, so marks do not nest and every run
//! carries at most one mark.
//!
//! # Example
//!
//! ```
//! use md2richtext::document::{Inline, Mark};
//! use md2richtext::inline::scan;
//!
//! let runs = scan("a **b** c");
//! assert_eq!(
//!     runs,
//!     vec![
//!         Inline::plain("a "),
//!         Inline::marked("b", Mark::Strong),
//!         Inline::plain(" c"),
//!     ]
//! );
//! ```

use crate::document::{Inline, Mark};

/// Characters that may open a marked run.
const SPECIALS: [char; 3] = ['*', '`', '['];

/// Scans a single line into text runs.
///
/// The runs cover the whole input: their texts concatenate to the input with
/// only the consumed delimiters removed. Empty input yields no runs.
#[must_use]
pub fn scan(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let (run, consumed) = marked(rest).unwrap_or_else(|| literal(rest));
        runs.push(run);
        rest = &rest[consumed..];
    }

    runs
}

/// Tries each marked form at the start of `rest`, strongest first.
///
/// Strong is tried before em so that `**x**` is not read as two em markers.
fn marked(rest: &str) -> Option<(Inline, usize)> {
    strong(rest)
        .or_else(|| em(rest))
        .or_else(|| code(rest))
        .or_else(|| link(rest))
}

fn strong(rest: &str) -> Option<(Inline, usize)> {
    let (text, consumed) = delimited(rest, "**", '*', "**")?;
    Some((Inline::marked(text, Mark::Strong), consumed))
}

fn em(rest: &str) -> Option<(Inline, usize)> {
    let (text, consumed) = delimited(rest, "*", '*', "*")?;
    Some((Inline::marked(text, Mark::Em), consumed))
}

fn code(rest: &str) -> Option<(Inline, usize)> {
    let (text, consumed) = delimited(rest, "`", '`', "`")?;
    Some((Inline::marked(text, Mark::Code), consumed))
}

fn link(rest: &str) -> Option<(Inline, usize)> {
    let (text, label_len) = delimited(rest, "[", ']', "](")?;
    let (href, href_len) = delimited(&rest[label_len - 1..], "(", ')', ")")?;
    let href = Mark::Link {
        href: href.to_owned(),
    };
    Some((Inline::marked(text, href), label_len - 1 + href_len))
}

/// Matches `open`, one or more characters other than `stop`, then `close`.
///
/// Returns the enclosed text and the number of bytes consumed.
fn delimited<'a>(rest: &'a str, open: &str, stop: char, close: &str) -> Option<(&'a str, usize)> {
    let body = rest.strip_prefix(open)?;
    let end = body.find(stop)?;
    if end == 0 || !body[end..].starts_with(close) {
        return None;
    }
    Some((&body[..end], open.len() + end + close.len()))
}

/// Takes plain text up to the next special character.
///
/// The first character is always taken, even when special: reaching here
/// means it did not open a marked run.
fn literal(rest: &str) -> (Inline, usize) {
    let first = rest.chars().next().map_or(0, char::len_utf8);
    let end = rest[first..]
        .find(SPECIALS)
        .map_or(rest.len(), |offset| first + offset);
    (Inline::plain(&rest[..end]), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn plain(text: &str) -> Inline {
        Inline::plain(text)
    }

    fn link_to(text: &str, href: &str) -> Inline {
        Inline::marked(text, Mark::Link { href: href.into() })
    }

    #[test]
    fn empty_input_yields_no_runs() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(scan("just some words"), vec![plain("just some words")]);
    }

    #[test]
    fn mixed_marks_split_into_seven_runs() {
        let runs = scan("**Bold** and *italic* and `code` and [link](url)");

        assert_eq!(
            runs,
            vec![
                Inline::marked("Bold", Mark::Strong),
                plain(" and "),
                Inline::marked("italic", Mark::Em),
                plain(" and "),
                Inline::marked("code", Mark::Code),
                plain(" and "),
                link_to("link", "url"),
            ]
        );
    }

    #[rstest]
    #[case::strong("**x**", Inline::marked("x", Mark::Strong))]
    #[case::em("*x*", Inline::marked("x", Mark::Em))]
    #[case::code("`x`", Inline::marked("x", Mark::Code))]
    #[case::link("[x](https://example.com/a?b=c)", link_to("x", "https://example.com/a?b=c"))]
    #[case::code_keeps_stars("`a*b*c`", Inline::marked("a*b*c", Mark::Code))]
    #[case::link_text_keeps_spaces("[two words](u)", link_to("two words", "u"))]
    fn single_marked_run(#[case] input: &str, #[case] expected: Inline) {
        assert_eq!(scan(input), vec![expected]);
    }

    #[rstest]
    #[case::lone_star("a * b", &["a ", "* b"])]
    #[case::empty_strong("****", &["*", "*", "*", "*"])]
    #[case::empty_code("``", &["`", "`"])]
    #[case::unclosed_code("`open", &["`open"])]
    #[case::unclosed_link("[text](url", &["[text](url"])]
    #[case::bracket_without_href("[text] more", &["[text] more"])]
    #[case::empty_href("[text]()", &["[text]()"])]
    fn unmatched_delimiters_stay_literal(#[case] input: &str, #[case] expected: &[&str]) {
        let runs = scan(input);

        assert!(runs.iter().all(|run| run.marks().is_empty()), "{runs:?}");
        let texts: Vec<&str> = runs.iter().map(Inline::text).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn literal_runs_cover_input() {
        let input = "x * y ` z [ w";
        let joined: String = scan(input).iter().map(Inline::text).collect();

        assert_eq!(joined, input);
    }

    #[test]
    fn nested_emphasis_is_not_recursive() {
        let runs = scan("**bold *and* nested**");

        assert_eq!(
            runs,
            vec![
                plain("*"),
                Inline::marked("bold ", Mark::Em),
                plain("and"),
                Inline::marked(" nested", Mark::Em),
                plain("*"),
            ]
        );
        assert!(runs.iter().all(|run| run.marks().len() <= 1));
    }

    #[test]
    fn marks_inside_link_text_are_not_scanned() {
        assert_eq!(scan("[**x**](u)"), vec![link_to("**x**", "u")]);
    }

    #[test]
    fn adjacent_marked_runs() {
        assert_eq!(
            scan("**a***b*"),
            vec![
                Inline::marked("a", Mark::Strong),
                Inline::marked("b", Mark::Em),
            ]
        );
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(
            scan("héllo *wörld* ✓"),
            vec![
                plain("héllo "),
                Inline::marked("wörld", Mark::Em),
                plain(" ✓"),
            ]
        );
    }

    #[test]
    fn scanning_is_repeatable() {
        let input = "no special characters here";

        assert_eq!(scan(input), scan(input));
    }
}
