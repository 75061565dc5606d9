//! Markdown <-> display conversion.
//!
//! Canonical syntax:
//! - `**bold**`
//! - `_italic_`
//! - `@user:<id>` and `[[page:<id>]]` (stable mentions)
//! - `@name` and `[[Title]]` (legacy mentions)
//!
//! Malformed syntax degrades to plain text; neither direction can fail.

pub mod scanner;

use crate::models::mark::{Mark, MarkKind, Mention};
use crate::text::{char_to_byte, split_at_char};
use scanner::Token;

/// Display text and marks derived from a line of markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub display_text: String,
    pub marks: Vec<Mark>,
}

/// Convert markdown text to display text plus marks.
///
/// Marks come out sorted by `start`, never overlap, and carry the markdown span
/// they were parsed from.
///
/// # Returns
/// The [`Decoded`] display form of `markdown_text`.
pub fn decode(markdown_text: &str) -> Decoded {
    let chars: Vec<char> = markdown_text.chars().collect();
    let mut display_text = String::with_capacity(markdown_text.len());
    let mut display_len = 0usize;
    let mut marks = Vec::new();
    // (display start, markdown start) of the span currently open.
    let mut open: Option<(usize, usize)> = None;

    let collect = |range: std::ops::Range<usize>| -> String { chars[range].iter().collect() };

    for token in scanner::tokenize(&chars) {
        match token {
            Token::Text(range) => {
                display_len += range.len();
                display_text.extend(&chars[range]);
            }
            Token::BoldOpen(at) | Token::ItalicOpen(at) => {
                open = Some((display_len, at));
            }
            Token::BoldClose(at) => {
                if let Some((start, md_start)) = open.take() {
                    marks.push(
                        Mark::bold(start, display_len).with_markdown_range(md_start..at + 2),
                    );
                }
            }
            Token::ItalicClose(at) => {
                if let Some((start, md_start)) = open.take() {
                    marks.push(
                        Mark::italic(start, display_len).with_markdown_range(md_start..at + 1),
                    );
                }
            }
            Token::MentionStable {
                span,
                mention_type,
                id,
            } => {
                let mention = Mention::stable(mention_type, collect(id));
                push_mention(&mut display_text, &mut display_len, &mut marks, mention, span);
            }
            Token::MentionLegacy {
                span,
                mention_type,
                name,
            } => {
                let mention = Mention::legacy(mention_type, collect(name));
                push_mention(&mut display_text, &mut display_len, &mut marks, mention, span);
            }
        }
    }

    Decoded {
        display_text,
        marks,
    }
}

fn push_mention(
    display_text: &mut String,
    display_len: &mut usize,
    marks: &mut Vec<Mark>,
    mention: Mention,
    span: std::ops::Range<usize>,
) {
    let shown = mention.display_text();
    let start = *display_len;
    *display_len += shown.chars().count();
    display_text.push_str(&shown);
    marks.push(Mark::mention(mention, start, *display_len).with_markdown_range(span));
}

/// Convert display text plus marks back to markdown.
///
/// Marks are applied from the last to the first so earlier char offsets stay
/// valid while splicing. Marks that do not fit the text, or that overlap a mark
/// already applied, are skipped.
///
/// # Returns
/// Canonical markdown text.
pub fn encode(display_text: &str, marks: &[Mark]) -> String {
    let display_len = display_text.chars().count();
    let mut ordered: Vec<&Mark> = marks.iter().filter(|mark| mark.fits(display_len)).collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = display_text.to_string();
    let mut applied_from = usize::MAX;
    for mark in ordered {
        if mark.end > applied_from {
            continue;
        }
        let (head, rest) = split_at_char(&result, mark.start);
        let content_end = char_to_byte(rest, mark.end - mark.start);
        let (content, tail) = rest.split_at(content_end);
        let replacement = match &mark.kind {
            MarkKind::Bold => format!("**{}**", content),
            MarkKind::Italic => format!("_{}_", content),
            MarkKind::Mention(mention) => mention.markdown_token(),
        };
        result = format!("{}{}{}", head, replacement, tail);
        applied_from = mark.start;
    }
    result
}
