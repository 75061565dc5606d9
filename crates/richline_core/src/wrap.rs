//! Width-constrained line reflow.
//!
//! Text is broken only at single spaces that sit outside every mark's markdown
//! span, so `**two words**` or `[[Page Title]]` always stay on one line. Widths
//! are measured in display chars. An atom wider than the budget gets a line of
//! its own and is never broken.

use crate::codec::decode;
use crate::text::char_to_byte;

/// A breakable unit of markdown text plus its display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Atom<'a> {
    text: &'a str,
    width: usize,
}

/// Split `text` at spaces outside marks.
fn atoms(text: &str) -> Vec<Atom<'_>> {
    let decoded = decode(text);
    let spans: Vec<(std::ops::Range<usize>, usize)> = decoded
        .marks
        .iter()
        .filter_map(|mark| {
            let range = mark.markdown_range.clone()?;
            let hidden = range.len().saturating_sub(mark.display_len());
            Some((range, hidden))
        })
        .collect();

    let chars: Vec<char> = text.chars().collect();
    let make = |from: usize, to: usize| {
        let hidden: usize = spans
            .iter()
            .filter(|(range, _)| range.start >= from && range.end <= to)
            .map(|(_, hidden)| *hidden)
            .sum();
        Atom {
            text: &text[char_to_byte(text, from)..char_to_byte(text, to)],
            width: (to - from).saturating_sub(hidden),
        }
    };

    let mut atoms = Vec::new();
    let mut start = 0usize;
    let mut span_idx = 0usize;
    for (idx, ch) in chars.iter().enumerate() {
        while span_idx < spans.len() && spans[span_idx].0.end <= idx {
            span_idx += 1;
        }
        let inside_mark = spans
            .get(span_idx)
            .map(|(range, _)| range.start < idx && idx < range.end)
            .unwrap_or(false);
        if *ch == ' ' && !inside_mark {
            atoms.push(make(start, idx));
            start = idx + 1;
        }
    }
    atoms.push(make(start, chars.len()));
    atoms
}

/// Reflow `line_text` into segments no wider than `chars_per_line`.
///
/// # Arguments
/// - `line_text`: Markdown text of one logical line.
/// - `chars_per_line`: Display-char budget per segment.
///
/// # Returns
/// Markdown segments in order. Joining them with `" "` reproduces
/// `line_text` exactly; a segment only exceeds the budget when it is a single
/// unbreakable atom.
pub fn wrap(line_text: &str, chars_per_line: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut width = 0usize;
    let mut count = 0usize;
    for atom in atoms(line_text) {
        // Empty atoms from leading or doubled spaces never force a break.
        if !current.is_empty() && width + 1 + atom.width > chars_per_line {
            segments.push(std::mem::take(&mut current));
            width = 0;
            count = 0;
        }
        if count > 0 {
            current.push(' ');
            width += 1;
        }
        current.push_str(atom.text);
        width += atom.width;
        count += 1;
    }
    segments.push(current);
    segments
}

/// Result of fitting edited text onto its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapPlan {
    /// Markdown that stays on the edited line.
    pub keep: String,
    /// Markdown pushed to the following line, when anything overflowed.
    pub overflow: Option<String>,
}

impl WrapPlan {
    /// `true` when the overflow holds more than whitespace.
    pub fn has_overflow(&self) -> bool {
        self.overflow
            .as_deref()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Split edited text into what stays on the line and what moves on.
pub fn plan_wrap(current_text: &str, chars_per_line: usize) -> WrapPlan {
    let mut segments = wrap(current_text, chars_per_line).into_iter();
    let keep = segments.next().unwrap_or_default();
    let rest: Vec<String> = segments.collect();
    WrapPlan {
        keep,
        overflow: if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        },
    }
}
