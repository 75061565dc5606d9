//! Char-indexed string helpers.
//!
//! Every offset in the editing model counts `char`s, so these helpers convert
//! between char offsets and the byte offsets `str` slicing needs.

/// Number of chars in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of char `char_index`, clamped to the end of `text`.
pub fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Split `text` at a char offset, clamping past-the-end offsets.
pub fn split_at_char(text: &str, char_index: usize) -> (&str, &str) {
    text.split_at(char_to_byte(text, char_index))
}

/// Borrow the chars in `start..end`, clamped to the text.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(text, start);
    let end_byte = char_to_byte(text, end.max(start));
    &text[start_byte..end_byte]
}
