//! Layout template, view preferences, and cursor coordinates.

use crate::constants::{
    DEFAULT_CHARS_PER_LINE, DEFAULT_LINES_PER_PAGE, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL,
};
use serde::{Deserialize, Serialize};

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Layout parameters supplied by the host; `chars_per_line` is the wrap budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub name: String,
    /// Inches.
    pub page_width: f32,
    /// Inches.
    pub page_height: f32,
    pub margins: Margins,
    pub font_family: String,
    /// Points.
    pub font_size: f32,
    pub line_height: f32,
    pub chars_per_line: usize,
    pub lines_per_page: usize,
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        Self {
            name: "US Legal".to_string(),
            page_width: 8.5,
            page_height: 11.0,
            margins: Margins {
                top: 1.0,
                right: 1.0,
                bottom: 1.0,
                left: 1.5,
            },
            font_family: "Times New Roman".to_string(),
            font_size: 12.0,
            line_height: 1.5,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
        }
    }
}

/// Display preferences; changing them never touches undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom_level: f32,
    pub show_page_breaks: bool,
    pub show_margins: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            show_page_breaks: true,
            show_margins: false,
        }
    }
}

impl ViewState {
    /// Set zoom, clamped to the supported range. Non-finite input is ignored.
    pub fn set_zoom_level(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom_level = zoom.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
        }
    }
}

/// A caret location in display coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line_index: usize,
    pub char_index: usize,
}

impl CursorPosition {
    pub fn new(line_index: usize, char_index: usize) -> Self {
        Self {
            line_index,
            char_index,
        }
    }
}

/// A selection between two display positions, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

impl Selection {
    pub fn new(start: CursorPosition, end: CursorPosition) -> Self {
        Self { start, end }
    }

    /// Endpoints ordered so the first comes before the second.
    pub fn normalized(&self) -> (CursorPosition, CursorPosition) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
