//! Shared constants used across Richline crates.

/// Maximum number of undo snapshots kept in the `past` stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default wrap budget for the built-in document template.
pub const DEFAULT_CHARS_PER_LINE: usize = 80;
/// Default page height, in lines, for the built-in document template.
pub const DEFAULT_LINES_PER_PAGE: usize = 54;

/// How long a cached mention entity stays valid before a sweep evicts it.
pub const DEFAULT_MENTION_CACHE_TTL_SECS: u64 = 5 * 60;
/// Cap for the recent-mentions tier (and each per-document tier).
pub const DEFAULT_MAX_RECENT_MENTIONS: usize = 10;

/// Per-tier limits used when searching the local mention cache.
pub const MENTION_SEARCH_RECENT_LIMIT: usize = 3;
/// Maximum hits contributed by the same-document tier.
pub const MENTION_SEARCH_DOCUMENT_LIMIT: usize = 4;
/// Upper bound on the merged mention search result.
pub const MENTION_SEARCH_MAX_RESULTS: usize = 10;

/// Zoom range accepted by the view state.
pub const MIN_ZOOM_LEVEL: f32 = 0.5;
/// Upper zoom bound.
pub const MAX_ZOOM_LEVEL: f32 = 2.0;

/// Text of the line a fresh session starts with.
pub const INITIAL_LINE_TEXT: &str = "This is the first line of your AI-Native document.";
