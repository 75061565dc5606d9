//! Display <-> markdown cursor translation.
//!
//! Both directions walk the marks in display order with one cursor per
//! coordinate space. Plain text between marks maps one-to-one. Inside a mark
//! the content maps one-to-one after the opening delimiter; markdown positions
//! that land inside a delimiter snap to the nearest mark boundary, so
//! `markdown_to_display(display_to_markdown(p))` is always `p` while the
//! reverse round trip is lossy inside delimiters.
//!
//! Marks produced by [`crate::codec::decode`] carry their markdown span. For
//! marks built without one, the span is found by searching for the mark's
//! syntax at or after the running markdown cursor; with repeated identical
//! spans this picks the first occurrence.

use crate::models::mark::{Mark, MarkKind};
use std::ops::Range;

/// A mark with both of its coordinate ranges resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    display: Range<usize>,
    markdown: Range<usize>,
    open: usize,
    close: usize,
    prefix: usize,
}

impl Span {
    fn markdown_content_len(&self) -> usize {
        self.markdown.len().saturating_sub(self.open + self.close)
    }

    fn display_content_len(&self) -> usize {
        self.display.len().saturating_sub(self.prefix)
    }
}

/// Find `mark`'s syntax in `chars` at or after `from`.
fn locate(mark: &Mark, chars: &[char], from: usize) -> Option<usize> {
    let matches_at = |at: usize| -> bool {
        match &mark.kind {
            MarkKind::Mention(mention) => {
                let token: Vec<char> = mention.markdown_token().chars().collect();
                chars.get(at..at + token.len()) == Some(token.as_slice())
            }
            MarkKind::Bold | MarkKind::Italic => {
                let delimiter = if mark.kind == MarkKind::Bold { '*' } else { '_' };
                let width = mark.markdown_open_len();
                let content = mark.display_len();
                let total = width * 2 + content;
                match chars.get(at..at + total) {
                    Some(window) => {
                        window[..width].iter().all(|c| *c == delimiter)
                            && window[total - width..].iter().all(|c| *c == delimiter)
                            && window[width..total - width].iter().all(|c| *c != delimiter)
                    }
                    None => false,
                }
            }
        }
    };
    (from..chars.len()).find(|&at| matches_at(at))
}

/// Resolve every valid mark to a [`Span`], in display order.
fn resolve_spans(markdown_text: &str, marks: &[Mark]) -> Vec<Span> {
    let mut ordered: Vec<&Mark> = marks.iter().filter(|mark| mark.start < mark.end).collect();
    ordered.sort_by_key(|mark| mark.start);

    let mut chars: Option<Vec<char>> = None;
    let mut spans: Vec<Span> = Vec::with_capacity(ordered.len());
    let mut display_cursor = 0usize;
    let mut markdown_cursor = 0usize;
    for mark in ordered {
        if mark.start < display_cursor {
            // Overlaps the previous mark; the codec never produces this.
            continue;
        }
        let markdown_start = match &mark.markdown_range {
            Some(range) => range.start,
            None => {
                let chars = chars.get_or_insert_with(|| markdown_text.chars().collect());
                locate(mark, chars, markdown_cursor)
                    .unwrap_or(markdown_cursor + (mark.start - display_cursor))
            }
        };
        let markdown = markdown_start..markdown_start + mark.markdown_len();
        display_cursor = mark.end;
        markdown_cursor = markdown.end;
        spans.push(Span {
            display: mark.start..mark.end,
            markdown,
            open: mark.markdown_open_len(),
            close: mark.markdown_close_len(),
            prefix: mark.display_prefix_len(),
        });
    }
    spans
}

/// Translate a display offset into a markdown offset.
///
/// # Arguments
/// - `display_pos`: Char offset into the line's display text.
/// - `markdown_text`: The line's markdown text.
/// - `marks`: The line's marks.
///
/// # Returns
/// The corresponding char offset into `markdown_text`. Positions inside a
/// mark land after its opening delimiter; the end of a mark lands before its
/// closing delimiter.
pub fn display_to_markdown(display_pos: usize, markdown_text: &str, marks: &[Mark]) -> usize {
    let markdown_len = markdown_text.chars().count();
    let mut display_cursor = 0usize;
    let mut markdown_cursor = 0usize;
    for span in resolve_spans(markdown_text, marks) {
        if display_pos <= span.display.start {
            return (markdown_cursor + (display_pos - display_cursor)).min(markdown_len);
        }
        if display_pos <= span.display.end {
            let offset = display_pos - span.display.start;
            let content = offset.saturating_sub(span.prefix).min(span.markdown_content_len());
            return (span.markdown.start + span.open + content).min(markdown_len);
        }
        display_cursor = span.display.end;
        markdown_cursor = span.markdown.end;
    }
    (markdown_cursor + display_pos.saturating_sub(display_cursor)).min(markdown_len)
}

/// Translate a markdown offset into a display offset.
///
/// # Arguments
/// - `markdown_pos`: Char offset into `markdown_text`.
/// - `markdown_text`: The line's markdown text.
/// - `marks`: The line's marks.
///
/// # Returns
/// The corresponding display offset. Offsets inside an opening delimiter snap
/// to the mark start, offsets inside a closing delimiter snap to its end.
pub fn markdown_to_display(markdown_pos: usize, markdown_text: &str, marks: &[Mark]) -> usize {
    let mut display_cursor = 0usize;
    let mut markdown_cursor = 0usize;
    for span in resolve_spans(markdown_text, marks) {
        if markdown_pos <= span.markdown.start {
            return display_cursor + markdown_pos.saturating_sub(markdown_cursor);
        }
        if markdown_pos <= span.markdown.end {
            let offset = markdown_pos - span.markdown.start;
            if offset < span.open {
                return span.display.start;
            }
            if offset >= span.markdown.len().saturating_sub(span.close) {
                return span.display.end;
            }
            let content = (offset - span.open).min(span.display_content_len());
            return span.display.start + span.prefix + content;
        }
        display_cursor = span.display.end;
        markdown_cursor = span.markdown.end;
    }
    display_cursor + markdown_pos.saturating_sub(markdown_cursor)
}
