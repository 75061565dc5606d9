//! Ordered line collection and its structural edits.
//!
//! Every operation validates its indices up front and returns an
//! [`EditorError`] without touching the document when they are out of range.

mod selection;

pub use selection::selection_markdown;

use crate::error::EditorError;
use crate::models::line::{CreatedBy, Line};
use crate::models::mark::Mention;
use crate::models::template::CursorPosition;
use crate::text::split_at_char;
use crate::wrap::{plan_wrap, wrap, WrapPlan};

/// Lines plus the caret, in display coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDocument {
    lines: Vec<Line>,
    cursor: CursorPosition,
}

impl LineDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self {
            lines,
            cursor: CursorPosition::default(),
        }
    }

    /// Turn multi-paragraph AI output into wrapped lines.
    ///
    /// Blank lines separate paragraphs and single newlines inside a paragraph
    /// become spaces. Each paragraph is trimmed and wrapped to
    /// `chars_per_line`; every resulting line is tagged [`CreatedBy::Ai`] and
    /// points at `parent_id` when one is given.
    ///
    /// # Returns
    /// An empty list when `text` holds nothing but whitespace.
    pub fn lines_from_ai_content(
        text: &str,
        parent_id: Option<&str>,
        chars_per_line: usize,
    ) -> Vec<Line> {
        let mut paragraphs = Vec::new();
        let mut rows: Vec<&str> = Vec::new();
        for row in text.split('\n').map(str::trim) {
            if !row.is_empty() {
                rows.push(row);
            } else if !rows.is_empty() {
                paragraphs.push(rows.join(" "));
                rows.clear();
            }
        }
        if !rows.is_empty() {
            paragraphs.push(rows.join(" "));
        }

        paragraphs
            .iter()
            .flat_map(|paragraph| wrap(paragraph, chars_per_line))
            .map(|row| {
                let mut line = Line::new(row, CreatedBy::Ai);
                line.set_parent_id(parent_id.map(str::to_string));
                line
            })
            .collect()
    }

    /// Re-hydrate a document from its serialized markdown.
    ///
    /// # Arguments
    /// - `text`: Markdown, one line per `\n` (a trailing `\r` is dropped).
    /// - `created_by`: Provenance tag for every line.
    pub fn from_markdown(text: &str, created_by: CreatedBy) -> Self {
        let lines = text
            .split('\n')
            .map(|row| Line::new(row.strip_suffix('\r').unwrap_or(row), created_by.clone()))
            .collect();
        Self::from_lines(lines)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    /// Move the caret, clamped to an existing line and its display length.
    pub fn set_cursor(&mut self, cursor: CursorPosition) {
        self.cursor = self.clamp(cursor);
    }

    /// Clamp a position to the document.
    pub fn clamp(&self, position: CursorPosition) -> CursorPosition {
        match self.lines.len() {
            0 => CursorPosition::default(),
            len => {
                let line_index = position.line_index.min(len - 1);
                let char_index = position.char_index.min(self.lines[line_index].display_len());
                CursorPosition::new(line_index, char_index)
            }
        }
    }

    pub(crate) fn restore(&mut self, lines: Vec<Line>, cursor: CursorPosition) {
        self.lines = lines;
        self.cursor = cursor;
    }

    /// Replace every line at once.
    pub fn replace_lines(&mut self, lines: Vec<Line>) {
        self.lines = lines;
        self.cursor = self.clamp(self.cursor);
    }

    /// Fail unless `index` names an existing line.
    pub fn check_line(&self, index: usize) -> Result<(), EditorError> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(EditorError::LineOutOfRange {
                index,
                len: self.lines.len(),
            })
        }
    }

    /// Fail unless `index` is a valid insertion point.
    pub fn check_insert(&self, index: usize) -> Result<(), EditorError> {
        if index <= self.lines.len() {
            Ok(())
        } else {
            Err(EditorError::InsertOutOfRange {
                index,
                len: self.lines.len(),
            })
        }
    }

    /// Fail unless `index` has a predecessor to merge into.
    pub fn check_merge(&self, index: usize) -> Result<(), EditorError> {
        if index == 0 {
            return Err(EditorError::NothingToMerge);
        }
        self.check_line(index)
    }

    /// Fail unless `start..=end` names existing lines in order.
    pub fn check_range(&self, start: usize, end: usize) -> Result<(), EditorError> {
        let len = self.lines.len();
        if len == 0 {
            return Err(EditorError::EmptyDocument);
        }
        if start > end || end >= len {
            return Err(EditorError::InvalidRange { start, end, len });
        }
        Ok(())
    }

    /// Markdown of lines `start..=end`, newline-joined.
    ///
    /// # Errors
    /// [`EditorError::EmptyDocument`] when there are no lines, and
    /// [`EditorError::InvalidRange`] when the range is reversed or runs past
    /// the last line.
    pub fn markdown_range(&self, start: usize, end: usize) -> Result<String, EditorError> {
        self.check_range(start, end)?;
        Ok(self.lines[start..=end]
            .iter()
            .map(Line::markdown_text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Insert a new line at `index`; the caret moves to its end.
    pub fn insert_line(
        &mut self,
        index: usize,
        text: &str,
        created_by: CreatedBy,
    ) -> Result<(), EditorError> {
        self.check_insert(index)?;
        let line = Line::new(text, created_by);
        let end = line.display_len();
        self.lines.insert(index, line);
        self.cursor = CursorPosition::new(index, end);
        Ok(())
    }

    /// Insert prepared lines at `index`; the caret moves to the end of the last.
    ///
    /// # Returns
    /// How many lines were inserted.
    pub fn insert_lines(&mut self, index: usize, lines: Vec<Line>) -> Result<usize, EditorError> {
        self.check_insert(index)?;
        let count = lines.len();
        if let Some(last) = lines.last() {
            self.cursor = CursorPosition::new(index + count - 1, last.display_len());
        }
        self.lines.splice(index..index, lines);
        Ok(count)
    }

    /// Swap lines `start..=end` for `lines`.
    ///
    /// The caret moves to the end of the last replacement line, or is clamped
    /// near `start` when `lines` is empty.
    ///
    /// # Returns
    /// How many lines were inserted.
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        lines: Vec<Line>,
    ) -> Result<usize, EditorError> {
        self.check_range(start, end)?;
        let count = lines.len();
        let cursor = lines
            .last()
            .map(|last| CursorPosition::new(start + count - 1, last.display_len()));
        self.lines.splice(start..=end, lines);
        self.cursor = match cursor {
            Some(cursor) => cursor,
            None => self.clamp(CursorPosition::new(start, 0)),
        };
        Ok(count)
    }

    /// Replace the markdown of line `index` as a human edit.
    pub fn update_line(&mut self, index: usize, markdown_text: &str) -> Result<(), EditorError> {
        self.update_line_as(index, markdown_text, CreatedBy::Human)
    }

    /// Replace the markdown of line `index`, recording who made the edit.
    pub fn update_line_as(
        &mut self,
        index: usize,
        markdown_text: &str,
        created_by: CreatedBy,
    ) -> Result<(), EditorError> {
        self.check_line(index)?;
        self.lines[index].set_markdown(markdown_text, created_by);
        Ok(())
    }

    /// Split line `index` at a markdown char offset.
    ///
    /// The original keeps the text before the offset; a new line holding the
    /// rest, derived from the original, is inserted right after it. Offsets
    /// past the end split at the end.
    pub fn split_line(&mut self, index: usize, char_index: usize) -> Result<(), EditorError> {
        self.check_line(index)?;
        let original = &mut self.lines[index];
        let (before, after) = split_at_char(original.markdown_text(), char_index);
        let (before, after) = (before.to_string(), after.to_string());
        let parent_id = original.id().to_string();
        original.set_markdown(before, CreatedBy::Human);

        let mut tail = Line::new(after, CreatedBy::Human);
        tail.set_parent_id(Some(parent_id));
        self.lines.insert(index + 1, tail);
        self.cursor = CursorPosition::new(index + 1, 0);
        Ok(())
    }

    /// Append line `index` to its predecessor and remove it.
    pub fn merge_line(&mut self, index: usize) -> Result<(), EditorError> {
        self.check_merge(index)?;
        let current = self.lines.remove(index);
        let previous = &mut self.lines[index - 1];
        let join_at = previous.markdown_len();
        let merged = format!("{}{}", previous.markdown_text(), current.markdown_text());
        previous.set_markdown(merged, CreatedBy::Human);
        previous.set_parent_id(Some(current.id().to_string()));
        let char_index = previous.markdown_to_display(join_at);
        self.cursor = CursorPosition::new(index - 1, char_index);
        Ok(())
    }

    /// Remove line `index`, pulling the caret back inside the document.
    pub fn delete_line(&mut self, index: usize) -> Result<(), EditorError> {
        self.check_line(index)?;
        self.lines.remove(index);
        if self.cursor.line_index >= self.lines.len() {
            self.cursor = match self.lines.last() {
                Some(last) => CursorPosition::new(self.lines.len() - 1, last.display_len()),
                None => CursorPosition::default(),
            };
        }
        Ok(())
    }

    /// Fit freshly edited text onto line `index`, pushing overflow onward.
    ///
    /// Overflow is prepended to the following line when there is one,
    /// otherwise it becomes a new line derived from the edited one. The caret
    /// lands at the start of the continuation, or at the end of the kept text
    /// when only whitespace overflowed.
    ///
    /// # Returns
    /// The [`WrapPlan`] that was applied.
    pub fn handle_auto_wrap(
        &mut self,
        index: usize,
        current_text: &str,
        chars_per_line: usize,
    ) -> Result<WrapPlan, EditorError> {
        self.check_line(index)?;
        let plan = plan_wrap(current_text, chars_per_line);
        match plan.overflow.as_deref() {
            None => {
                self.lines[index].set_markdown(current_text, CreatedBy::Human);
            }
            Some(overflow) if plan.has_overflow() => {
                self.lines[index].set_markdown(plan.keep.as_str(), CreatedBy::Human);
                match self.lines.get_mut(index + 1) {
                    Some(next) => {
                        let merged = format!("{} {}", overflow, next.markdown_text());
                        next.set_markdown(merged, CreatedBy::Human);
                    }
                    None => {
                        let mut continuation = Line::new(overflow, CreatedBy::Human);
                        continuation.set_parent_id(Some(self.lines[index].id().to_string()));
                        self.lines.insert(index + 1, continuation);
                    }
                }
                self.cursor = CursorPosition::new(index + 1, 0);
            }
            Some(_) => {
                let line = &mut self.lines[index];
                line.set_markdown(plan.keep.as_str(), CreatedBy::Human);
                self.cursor = CursorPosition::new(index, line.display_len());
            }
        }
        Ok(plan)
    }

    /// Assign 1-based page numbers and positions for `lines_per_page`.
    pub fn repaginate(&mut self, lines_per_page: usize) {
        let per_page = lines_per_page.max(1);
        for (idx, line) in self.lines.iter_mut().enumerate() {
            line.set_page_position(idx / per_page + 1, idx % per_page + 1);
        }
    }

    /// Visit every mention mark in the document.
    pub fn for_each_mention_mut(&mut self, mut visit: impl FnMut(&mut Mention)) {
        for line in &mut self.lines {
            for mark in line.marks_mut() {
                if let Some(mention) = mark.as_mention_mut() {
                    visit(mention);
                }
            }
        }
    }

    /// Serialized form: the markdown of every line.
    pub fn to_markdown_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.markdown_text().to_string())
            .collect()
    }

    pub fn to_markdown(&self) -> String {
        self.to_markdown_lines().join("\n")
    }

    /// Display text of every line, newline-joined.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::display_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
