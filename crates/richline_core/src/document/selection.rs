//! Markdown reconstruction for a display-space selection.

use crate::codec::encode;
use crate::models::line::Line;
use crate::models::mark::{Mark, MarkKind};
use crate::models::template::Selection;
use crate::text::char_slice;

/// Clip `marks` to the display window `from..to`, rebased to `from`.
///
/// Bold and italic survive partial selection; a mention that is only partly
/// selected is dropped and its visible chars are kept as plain text.
fn clip_marks(marks: &[Mark], from: usize, to: usize) -> Vec<Mark> {
    marks
        .iter()
        .filter(|mark| mark.start < to && mark.end > from)
        .filter(|mark| match mark.kind {
            MarkKind::Mention(_) => mark.start >= from && mark.end <= to,
            MarkKind::Bold | MarkKind::Italic => true,
        })
        .map(|mark| {
            Mark::new(
                mark.kind.clone(),
                mark.start.max(from) - from,
                mark.end.min(to) - from,
            )
        })
        .collect()
}

/// Rebuild the markdown covered by `selection`.
///
/// # Arguments
/// - `lines`: Document lines.
/// - `selection`: Display-space selection; endpoints may be in either order.
///
/// # Returns
/// The selected markdown, one row per touched line joined with `\n`. Lines
/// past the end of the document are ignored.
pub fn selection_markdown(lines: &[Line], selection: &Selection) -> String {
    let (start, end) = selection.normalized();
    let mut rows = Vec::new();
    for line_index in start.line_index..=end.line_index {
        let Some(line) = lines.get(line_index) else {
            break;
        };
        let display_len = line.display_len();
        let from = if line_index == start.line_index {
            start.char_index.min(display_len)
        } else {
            0
        };
        let to = if line_index == end.line_index {
            end.char_index.min(display_len)
        } else {
            display_len
        };
        let to = to.max(from);
        let text = char_slice(line.display_text(), from, to);
        rows.push(encode(text, &clip_marks(line.marks(), from, to)));
    }
    rows.join("\n")
}
