//! Formatting marks over display text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Entity kind a mention points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionType {
    User,
    Page,
}

impl MentionType {
    /// Prefix used inside stable ids (`user:` / `page:`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for MentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat metadata view of a mention, as exchanged with mention collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionMetadata {
    pub mention_type: MentionType,
    pub mention_id: String,
    pub is_stable_id: bool,
}

/// A user or page mention, stable (`@user:<id>`, `[[page:<id>]]`) or legacy
/// (`@name`, `[[Title]]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub mention_type: MentionType,
    /// Stable entity id, or the literal name/title for legacy mentions.
    pub id: String,
    pub is_stable_id: bool,
    /// Resolved human-readable label; never part of the display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Mention {
    pub fn stable(mention_type: MentionType, id: impl Into<String>) -> Self {
        Self {
            mention_type,
            id: id.into(),
            is_stable_id: true,
            display_name: None,
        }
    }

    pub fn legacy(mention_type: MentionType, name: impl Into<String>) -> Self {
        Self {
            mention_type,
            id: name.into(),
            is_stable_id: false,
            display_name: None,
        }
    }

    /// `user:<id>` / `page:<id>` for stable mentions, the literal otherwise.
    pub fn value(&self) -> String {
        if self.is_stable_id {
            format!("{}:{}", self.mention_type, self.id)
        } else {
            self.id.clone()
        }
    }

    pub fn metadata(&self) -> MentionMetadata {
        MentionMetadata {
            mention_type: self.mention_type,
            mention_id: self.id.clone(),
            is_stable_id: self.is_stable_id,
        }
    }

    /// Canonical markdown token for this mention.
    pub fn markdown_token(&self) -> String {
        match (self.mention_type, self.is_stable_id) {
            (MentionType::User, true) => format!("@user:{}", self.id),
            (MentionType::User, false) => format!("@{}", self.id),
            (MentionType::Page, true) => format!("[[page:{}]]", self.id),
            (MentionType::Page, false) => format!("[[{}]]", self.id),
        }
    }

    /// Text the mention occupies in display coordinates.
    pub fn display_text(&self) -> String {
        match self.mention_type {
            MentionType::User => format!("@{}", self.id),
            MentionType::Page => self.id.clone(),
        }
    }

    /// Label a UI shows for the mention: the resolved name when known.
    pub fn label(&self) -> String {
        match (&self.display_name, self.mention_type) {
            (Some(name), MentionType::User) => format!("@{}", name),
            (Some(name), MentionType::Page) => name.clone(),
            (None, _) => self.display_text(),
        }
    }
}

/// Discriminant-only view of [`MarkKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Bold,
    Italic,
    Mention,
}

/// What a mark formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarkKind {
    Bold,
    Italic,
    Mention(Mention),
}

/// A formatting annotation over the half-open display range `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mark {
    #[serde(flatten)]
    pub kind: MarkKind,
    pub start: usize,
    pub end: usize,
    /// Source span of the mark in markdown coordinates, delimiters included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_range: Option<Range<usize>>,
}

impl Mark {
    pub fn new(kind: MarkKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            markdown_range: None,
        }
    }

    pub fn bold(start: usize, end: usize) -> Self {
        Self::new(MarkKind::Bold, start, end)
    }

    pub fn italic(start: usize, end: usize) -> Self {
        Self::new(MarkKind::Italic, start, end)
    }

    pub fn mention(mention: Mention, start: usize, end: usize) -> Self {
        Self::new(MarkKind::Mention(mention), start, end)
    }

    pub fn with_markdown_range(mut self, range: Range<usize>) -> Self {
        self.markdown_range = Some(range);
        self
    }

    pub fn mark_type(&self) -> MarkType {
        match self.kind {
            MarkKind::Bold => MarkType::Bold,
            MarkKind::Italic => MarkType::Italic,
            MarkKind::Mention(_) => MarkType::Mention,
        }
    }

    pub fn as_mention(&self) -> Option<&Mention> {
        match &self.kind {
            MarkKind::Mention(mention) => Some(mention),
            _ => None,
        }
    }

    pub fn as_mention_mut(&mut self) -> Option<&mut Mention> {
        match &mut self.kind {
            MarkKind::Mention(mention) => Some(mention),
            _ => None,
        }
    }

    /// Length of the mark in display chars.
    pub fn display_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// `true` when the range is non-empty and fits a display text of `len` chars.
    pub fn fits(&self, len: usize) -> bool {
        self.start < self.end && self.end <= len
    }

    /// Chars of markdown syntax before the content (`**`, `_`, `@user:`, ...).
    pub fn markdown_open_len(&self) -> usize {
        match &self.kind {
            MarkKind::Bold => 2,
            MarkKind::Italic => 1,
            MarkKind::Mention(mention) => match (mention.mention_type, mention.is_stable_id) {
                (MentionType::User, true) => 6,
                (MentionType::Page, true) => 7,
                (MentionType::User, false) => 1,
                (MentionType::Page, false) => 2,
            },
        }
    }

    /// Chars of markdown syntax after the content.
    pub fn markdown_close_len(&self) -> usize {
        match &self.kind {
            MarkKind::Bold => 2,
            MarkKind::Italic => 1,
            MarkKind::Mention(mention) => match mention.mention_type {
                MentionType::User => 0,
                MentionType::Page => 2,
            },
        }
    }

    /// Chars of display text before the content (the `@` of user mentions).
    pub fn display_prefix_len(&self) -> usize {
        match &self.kind {
            MarkKind::Mention(mention) if mention.mention_type == MentionType::User => 1,
            _ => 0,
        }
    }

    /// Full markdown length of the mark, delimiters included.
    pub fn markdown_len(&self) -> usize {
        match &self.markdown_range {
            Some(range) => range.end.saturating_sub(range.start),
            None => {
                let content = self.display_len().saturating_sub(self.display_prefix_len());
                self.markdown_open_len() + content + self.markdown_close_len()
            }
        }
    }
}
