//! In-document search state.

use crate::models::line::Line;
use crate::models::template::CursorPosition;
use serde::{Deserialize, Serialize};

/// Query, match positions, and the match currently focused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    /// Match starts in display coordinates, in document order.
    pub results: Vec<CursorPosition>,
    pub current_index: Option<usize>,
    pub is_active: bool,
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive, non-overlapping match starts of `needle` in `haystack`.
fn find_all(haystack: &str, needle: &[char]) -> Vec<usize> {
    let chars: Vec<char> = haystack.chars().collect();
    let mut found = Vec::new();
    if needle.is_empty() || needle.len() > chars.len() {
        return found;
    }
    let mut at = 0;
    while at + needle.len() <= chars.len() {
        let hit = chars[at..at + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| chars_match(*a, *b));
        if hit {
            found.push(at);
            at += needle.len();
        } else {
            at += 1;
        }
    }
    found
}

impl SearchState {
    /// Run `query` over the display text of `lines`.
    ///
    /// # Returns
    /// The first match, which becomes current. A blank query clears the search.
    pub fn search(&mut self, lines: &[Line], query: &str) -> Option<CursorPosition> {
        if query.is_empty() {
            self.clear();
            return None;
        }
        let needle: Vec<char> = query.chars().collect();
        self.query = query.to_string();
        self.results = lines
            .iter()
            .enumerate()
            .flat_map(|(line_index, line)| {
                find_all(line.display_text(), &needle)
                    .into_iter()
                    .map(move |char_index| CursorPosition::new(line_index, char_index))
            })
            .collect();
        self.is_active = true;
        self.current_index = if self.results.is_empty() { None } else { Some(0) };
        self.current()
    }

    pub fn current(&self) -> Option<CursorPosition> {
        self.current_index.and_then(|idx| self.results.get(idx).copied())
    }

    /// Focus the following match, wrapping to the first.
    pub fn next(&mut self) -> Option<CursorPosition> {
        let len = self.results.len();
        if len == 0 {
            return None;
        }
        self.current_index = Some(self.current_index.map_or(0, |idx| (idx + 1) % len));
        self.current()
    }

    /// Focus the preceding match, wrapping to the last.
    pub fn previous(&mut self) -> Option<CursorPosition> {
        let len = self.results.len();
        if len == 0 {
            return None;
        }
        self.current_index = Some(self.current_index.map_or(len - 1, |idx| (idx + len - 1) % len));
        self.current()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line::CreatedBy;

    fn lines(rows: &[&str]) -> Vec<Line> {
        rows.iter().map(|row| Line::new(*row, CreatedBy::Human)).collect()
    }

    #[test]
    fn finds_matches_in_display_text() {
        let lines = lines(&["The **cat** sat", "concatenate CAT"]);
        let mut search = SearchState::default();
        assert_eq!(search.search(&lines, "cat"), Some(CursorPosition::new(0, 4)));
        assert_eq!(
            search.results,
            vec![
                CursorPosition::new(0, 4),
                CursorPosition::new(1, 3),
                CursorPosition::new(1, 12),
            ]
        );
        assert!(search.is_active);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let lines = lines(&["a a a"]);
        let mut search = SearchState::default();
        search.search(&lines, "a");
        assert_eq!(search.next(), Some(CursorPosition::new(0, 2)));
        assert_eq!(search.next(), Some(CursorPosition::new(0, 4)));
        assert_eq!(search.next(), Some(CursorPosition::new(0, 0)));
        assert_eq!(search.previous(), Some(CursorPosition::new(0, 4)));
    }

    #[test]
    fn no_matches_and_blank_query() {
        let lines = lines(&["nothing here"]);
        let mut search = SearchState::default();
        assert_eq!(search.search(&lines, "zzz"), None);
        assert!(search.is_active);
        assert_eq!(search.next(), None);

        search.search(&lines, "");
        assert_eq!(search, SearchState::default());
    }

    #[test]
    fn matches_do_not_overlap() {
        assert_eq!(find_all("aaaa", &['a', 'a']), vec![0, 2]);
        assert_eq!(find_all("ÄÖ äö", &['ä', 'ö']), vec![0, 3]);
    }
}
