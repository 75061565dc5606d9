//! Single forward scan of markdown text into a tagged token stream.
//!
//! At every position the recognizers are tried in priority order (bold,
//! italic, stable user, stable page, legacy user, legacy page). The first one
//! that matches is consumed whole, so tokens never overlap and syntax nested
//! inside a matched span stays plain content.

use crate::models::mark::MentionType;
use std::ops::Range;

/// Tokens emitted by [`tokenize`]. Ranges are char offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain text, copied to display text verbatim.
    Text(Range<usize>),
    /// `**` opening a bold span.
    BoldOpen(usize),
    /// `**` closing a bold span.
    BoldClose(usize),
    /// `_` opening an italic span.
    ItalicOpen(usize),
    /// `_` closing an italic span.
    ItalicClose(usize),
    /// `@user:<id>` or `[[page:<id>]]`.
    MentionStable {
        span: Range<usize>,
        mention_type: MentionType,
        id: Range<usize>,
    },
    /// `@name` or `[[Title]]`.
    MentionLegacy {
        span: Range<usize>,
        mention_type: MentionType,
        name: Range<usize>,
    },
}

/// A recognizer hit: the matched span and the content inside its delimiters.
struct Hit {
    span: Range<usize>,
    content: Range<usize>,
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut idx = at;
    for expected in pattern.chars() {
        if chars.get(idx) != Some(&expected) {
            return false;
        }
        idx += 1;
    }
    true
}

/// `open` + one or more chars accepted by `content` + `close`.
fn delimited(
    chars: &[char],
    at: usize,
    open: &str,
    close: &str,
    content: impl Fn(char) -> bool,
) -> Option<Hit> {
    if !starts_with(chars, at, open) {
        return None;
    }
    let content_start = at + open.chars().count();
    let mut idx = content_start;
    while idx < chars.len() && content(chars[idx]) {
        idx += 1;
    }
    if idx == content_start || !starts_with(chars, idx, close) {
        return None;
    }
    Some(Hit {
        span: at..idx + close.chars().count(),
        content: content_start..idx,
    })
}

/// Chars accepted in a stable mention id.
pub(crate) fn is_stable_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Chars accepted in a legacy `@name` mention (ASCII word chars).
pub(crate) fn is_legacy_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn bold(chars: &[char], at: usize) -> Option<Hit> {
    delimited(chars, at, "**", "**", |c| c != '*')
}

/// `_` only delimits at a word edge, so `snake_case` stays plain text.
fn italic(chars: &[char], at: usize) -> Option<Hit> {
    let is_word = |idx: Option<usize>| {
        idx.and_then(|idx| chars.get(idx))
            .map_or(false, |c| c.is_alphanumeric())
    };
    if is_word(at.checked_sub(1)) {
        return None;
    }
    delimited(chars, at, "_", "_", |c| c != '_').filter(|hit| !is_word(Some(hit.span.end)))
}

fn stable_user(chars: &[char], at: usize) -> Option<Hit> {
    delimited(chars, at, "@user:", "", is_stable_id_char)
}

fn stable_page(chars: &[char], at: usize) -> Option<Hit> {
    delimited(chars, at, "[[page:", "]]", |c| c != ']')
}

fn legacy_user(chars: &[char], at: usize) -> Option<Hit> {
    delimited(chars, at, "@", "", is_legacy_name_char)
}

fn legacy_page(chars: &[char], at: usize) -> Option<Hit> {
    delimited(chars, at, "[[", "]]", |c| c != ']')
}

fn match_at(chars: &[char], at: usize) -> Option<Vec<Token>> {
    // Cheap first-char gate; every recognizer starts with one of these.
    match chars[at] {
        '*' | '_' | '@' | '[' => {}
        _ => return None,
    }
    if let Some(hit) = bold(chars, at) {
        return Some(vec![
            Token::BoldOpen(hit.span.start),
            Token::Text(hit.content),
            Token::BoldClose(hit.span.end - 2),
        ]);
    }
    if let Some(hit) = italic(chars, at) {
        return Some(vec![
            Token::ItalicOpen(hit.span.start),
            Token::Text(hit.content),
            Token::ItalicClose(hit.span.end - 1),
        ]);
    }
    if let Some(hit) = stable_user(chars, at) {
        return Some(vec![Token::MentionStable {
            span: hit.span,
            mention_type: MentionType::User,
            id: hit.content,
        }]);
    }
    if let Some(hit) = stable_page(chars, at) {
        return Some(vec![Token::MentionStable {
            span: hit.span,
            mention_type: MentionType::Page,
            id: hit.content,
        }]);
    }
    if let Some(hit) = legacy_user(chars, at) {
        return Some(vec![Token::MentionLegacy {
            span: hit.span,
            mention_type: MentionType::User,
            name: hit.content,
        }]);
    }
    legacy_page(chars, at).map(|hit| {
        vec![Token::MentionLegacy {
            span: hit.span,
            mention_type: MentionType::Page,
            name: hit.content,
        }]
    })
}

fn token_end(tokens: &[Token]) -> usize {
    match tokens.last() {
        Some(Token::BoldClose(at)) => at + 2,
        Some(Token::ItalicClose(at)) => at + 1,
        Some(Token::MentionStable { span, .. }) | Some(Token::MentionLegacy { span, .. }) => {
            span.end
        }
        Some(Token::Text(range)) => range.end,
        Some(Token::BoldOpen(at)) | Some(Token::ItalicOpen(at)) => *at,
        None => 0,
    }
}

/// Tokenize `chars` in one left-to-right pass.
///
/// Unterminated or empty syntax (`**`, `_x`, `@`, `[[]]`) is plain text.
pub fn tokenize(chars: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut idx = 0usize;
    while idx < chars.len() {
        match match_at(chars, idx) {
            Some(matched) => {
                if let Some(start) = text_start.take() {
                    tokens.push(Token::Text(start..idx));
                }
                idx = token_end(&matched);
                tokens.extend(matched);
            }
            None => {
                text_start.get_or_insert(idx);
                idx += 1;
            }
        }
    }
    if let Some(start) = text_start {
        tokens.push(Token::Text(start..chars.len()));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn bold_emits_open_text_close() {
        assert_eq!(
            tokenize(&chars("a **b** c")),
            vec![
                Token::Text(0..2),
                Token::BoldOpen(2),
                Token::Text(4..5),
                Token::BoldClose(5),
                Token::Text(7..9),
            ]
        );
    }

    #[test]
    fn stable_user_wins_over_legacy_at_same_position() {
        let tokens = tokenize(&chars("@user:42"));
        assert_eq!(
            tokens,
            vec![Token::MentionStable {
                span: 0..8,
                mention_type: MentionType::User,
                id: 6..8,
            }]
        );
    }

    #[test]
    fn stable_page_wins_over_legacy_page() {
        let tokens = tokenize(&chars("[[page:7]] [[Roadmap]]"));
        assert!(matches!(
            tokens[0],
            Token::MentionStable {
                mention_type: MentionType::Page,
                ..
            }
        ));
        assert_eq!(
            tokens[2],
            Token::MentionLegacy {
                span: 11..22,
                mention_type: MentionType::Page,
                name: 13..20,
            }
        );
    }

    #[test]
    fn unterminated_syntax_is_plain_text() {
        for text in ["**open", "_half", "@", "[[]]", "[[unclosed", "****"] {
            assert_eq!(
                tokenize(&chars(text)),
                vec![Token::Text(0..text.chars().count())],
                "text: {}",
                text
            );
        }
    }

    #[test]
    fn outer_span_absorbs_nested_syntax() {
        let tokens = tokenize(&chars("**@user:1**"));
        assert_eq!(
            tokens,
            vec![
                Token::BoldOpen(0),
                Token::Text(2..9),
                Token::BoldClose(9),
            ]
        );
    }
}
