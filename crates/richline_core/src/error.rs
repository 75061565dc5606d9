//! Error types for the editing model.
use thiserror::Error;

/// Top-level editor error type.
///
/// None of these are user-facing: a failed operation leaves the session
/// exactly as it was and the caller simply carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("line {index} is out of range (document has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    #[error("cannot insert at {index} (document has {len} lines)")]
    InsertOutOfRange { index: usize, len: usize },

    #[error("the first line has no predecessor to merge into")]
    NothingToMerge,

    #[error("document has no lines")]
    EmptyDocument,

    #[error("invalid line range {start}..={end} (document has {len} lines)")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("mention resolution failed: {0}")]
    MentionResolution(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
