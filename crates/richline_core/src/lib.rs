//! Core editing model for Richline (codec, position mapping, wrap, history).

/// Markdown <-> display conversion.
pub mod codec;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across Richline crates.
pub mod constants;
/// Ordered line collection and its structural edits.
pub mod document;
/// Editor error types.
pub mod error;
/// Bounded snapshot undo/redo history.
pub mod history;
/// Mention tokens, entities, and the resolution cache.
pub mod mention;
/// Data models for lines, marks, and layout templates.
pub mod models;
/// Display <-> markdown cursor translation.
pub mod position;
/// In-document search state.
pub mod search;
/// Editing session composition root.
pub mod session;
/// Char-indexed string helpers.
pub mod text;
/// Width-constrained line reflow.
pub mod wrap;

pub use codec::{decode, encode, Decoded};
pub use config::EditorConfig;
pub use document::{selection_markdown, LineDocument};
pub use error::EditorError;
pub use history::HistoryManager;
pub use mention::{
    parse_mention_token, CacheStats, MentionCache, MentionEntity, MentionResolver,
};
pub use models::line::{CreatedBy, Line};
pub use models::mark::{Mark, MarkKind, MarkType, Mention, MentionMetadata, MentionType};
pub use models::template::{CursorPosition, DocumentTemplate, Selection, ViewState};
pub use position::{display_to_markdown, markdown_to_display};
pub use search::SearchState;
pub use session::{EditorSession, EditorSnapshot};
pub use wrap::{plan_wrap, wrap, WrapPlan};
