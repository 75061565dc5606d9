//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_CHARS_PER_LINE, DEFAULT_HISTORY_LIMIT, DEFAULT_LINES_PER_PAGE,
    DEFAULT_MAX_RECENT_MENTIONS, DEFAULT_MENTION_CACHE_TTL_SECS,
};
use crate::error::EditorError;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Runtime configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditorConfig {
    pub history_limit: usize,
    pub chars_per_line: usize,
    pub lines_per_page: usize,
    pub mention_cache_ttl_secs: u64,
    pub max_recent_mentions: usize,
    pub show_page_breaks: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            chars_per_line: DEFAULT_CHARS_PER_LINE,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            mention_cache_ttl_secs: DEFAULT_MENTION_CACHE_TTL_SECS,
            max_recent_mentions: DEFAULT_MAX_RECENT_MENTIONS,
            show_page_breaks: true,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparseable config value");
                default
            }
        },
        None => default,
    }
}

impl EditorConfig {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`EditorConfig`] with defaults applied when env vars are
    /// missing or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a `RICHLINE_*` key, if set.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            history_limit: parsed(&lookup, "RICHLINE_HISTORY_LIMIT", defaults.history_limit),
            chars_per_line: parsed(&lookup, "RICHLINE_CHARS_PER_LINE", defaults.chars_per_line),
            lines_per_page: parsed(&lookup, "RICHLINE_LINES_PER_PAGE", defaults.lines_per_page),
            mention_cache_ttl_secs: parsed(
                &lookup,
                "RICHLINE_MENTION_TTL_SECS",
                defaults.mention_cache_ttl_secs,
            ),
            max_recent_mentions: parsed(
                &lookup,
                "RICHLINE_MAX_RECENT_MENTIONS",
                defaults.max_recent_mentions,
            ),
            show_page_breaks: lookup("RICHLINE_SHOW_PAGE_BREAKS")
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(defaults.show_page_breaks),
        }
    }

    /// Reject layouts the wrap engine and paginator cannot work with.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.chars_per_line == 0 {
            return Err(EditorError::InvalidConfig(
                "chars_per_line must be at least 1".to_string(),
            ));
        }
        if self.lines_per_page == 0 {
            return Err(EditorError::InvalidConfig(
                "lines_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = EditorConfig::from_lookup(|_| None);
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.chars_per_line, 80);
    }

    #[test]
    fn lookup_overrides_and_bad_values() {
        let config = EditorConfig::from_lookup(lookup_from(&[
            ("RICHLINE_HISTORY_LIMIT", "5"),
            ("RICHLINE_CHARS_PER_LINE", " 40 "),
            ("RICHLINE_LINES_PER_PAGE", "many"),
            ("RICHLINE_SHOW_PAGE_BREAKS", "off"),
        ]));
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.chars_per_line, 40);
        assert_eq!(config.lines_per_page, 54);
        assert!(!config.show_page_breaks);
    }

    #[test]
    fn validate_rejects_zero_budgets() {
        let config = EditorConfig {
            chars_per_line: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EditorError::InvalidConfig(_))
        ));
        assert!(EditorConfig::default().validate().is_ok());
    }
}
