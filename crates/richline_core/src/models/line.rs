//! Line entity and provenance tags.

use crate::codec::{self, Decoded};
use crate::models::mark::Mark;
use crate::text::char_len;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who performed the last mutation of a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Human,
    Ai,
    /// An automated agent, by identifier.
    Agent(String),
}

impl fmt::Display for CreatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => f.write_str("human"),
            Self::Ai => f.write_str("ai"),
            Self::Agent(id) => f.write_str(id),
        }
    }
}

/// One row of the document.
///
/// `markdown_text` is the source of truth. `display_text` and `marks` are
/// always `codec::decode(markdown_text)`; nothing can set them directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    id: String,
    parent_id: Option<String>,
    markdown_text: String,
    display_text: String,
    marks: Vec<Mark>,
    created_by: CreatedBy,
    created_at: DateTime<Utc>,
    page_number: usize,
    line_on_page: usize,
}

impl Line {
    /// Create a line with a fresh id.
    ///
    /// # Arguments
    /// - `markdown_text`: Canonical source text.
    /// - `created_by`: Provenance tag.
    ///
    /// # Returns
    /// A decoded [`Line`] with zeroed pagination.
    pub fn new(markdown_text: impl Into<String>, created_by: CreatedBy) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), markdown_text, created_by)
    }

    /// Create a line that keeps a known id, as when re-hydrating stored text.
    pub fn with_id(
        id: impl Into<String>,
        markdown_text: impl Into<String>,
        created_by: CreatedBy,
    ) -> Self {
        let markdown_text = markdown_text.into();
        let Decoded {
            display_text,
            marks,
        } = codec::decode(&markdown_text);
        Self {
            id: id.into(),
            parent_id: None,
            markdown_text,
            display_text,
            marks,
            created_by,
            created_at: Utc::now(),
            page_number: 0,
            line_on_page: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn markdown_text(&self) -> &str {
        &self.markdown_text
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Mutable marks, for annotating mentions with resolved names.
    ///
    /// Only [`crate::models::mark::Mention::display_name`] should be touched
    /// through this; positions and kinds belong to the codec.
    pub(crate) fn marks_mut(&mut self) -> &mut [Mark] {
        &mut self.marks
    }

    pub fn created_by(&self) -> &CreatedBy {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn line_on_page(&self) -> usize {
        self.line_on_page
    }

    /// Length of the display text in chars.
    pub fn display_len(&self) -> usize {
        char_len(&self.display_text)
    }

    /// Length of the markdown text in chars.
    pub fn markdown_len(&self) -> usize {
        char_len(&self.markdown_text)
    }

    /// Replace the markdown text and re-derive display text and marks.
    pub fn set_markdown(&mut self, markdown_text: impl Into<String>, created_by: CreatedBy) {
        let markdown_text = markdown_text.into();
        let Decoded {
            display_text,
            marks,
        } = codec::decode(&markdown_text);
        self.markdown_text = markdown_text;
        self.display_text = display_text;
        self.marks = marks;
        self.created_by = created_by;
        self.created_at = Utc::now();
    }

    pub fn set_parent_id(&mut self, parent_id: Option<String>) {
        self.parent_id = parent_id;
    }

    pub fn set_created_by(&mut self, created_by: CreatedBy) {
        self.created_by = created_by;
    }

    /// Pagination metadata is owned by whoever lays the document out.
    pub fn set_page_position(&mut self, page_number: usize, line_on_page: usize) {
        self.page_number = page_number;
        self.line_on_page = line_on_page;
    }

    /// Translate a display offset on this line into markdown coordinates.
    pub fn display_to_markdown(&self, display_pos: usize) -> usize {
        crate::position::display_to_markdown(display_pos, &self.markdown_text, &self.marks)
    }

    /// Translate a markdown offset on this line into display coordinates.
    pub fn markdown_to_display(&self, markdown_pos: usize) -> usize {
        crate::position::markdown_to_display(markdown_pos, &self.markdown_text, &self.marks)
            .min(self.display_len())
    }
}
