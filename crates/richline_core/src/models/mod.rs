//! Data models for lines, marks, and layout templates.

/// Line entity and provenance tags.
pub mod line;
/// Formatting marks and mentions.
pub mod mark;
/// Layout template, view preferences, and cursor coordinates.
pub mod template;
