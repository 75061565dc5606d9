//! Mention tokens, entities, and the resolution cache.

mod cache;

pub use cache::{CacheStats, MentionCache};

use crate::codec::decode;
use crate::error::EditorError;
use crate::models::mark::{Mention, MentionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Something a mention can point at, as known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mention_type: MentionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl MentionEntity {
    pub fn new(mention_type: MentionType, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mention_type,
            last_used: None,
        }
    }

    /// Stable markdown token referencing this entity.
    pub fn to_markdown(&self) -> String {
        Mention::stable(self.mention_type, self.id.as_str()).markdown_token()
    }
}

/// Parse `text` as exactly one mention token.
///
/// # Returns
/// `None` unless the whole input decodes to a single mention.
pub fn parse_mention_token(text: &str) -> Option<Mention> {
    let decoded = decode(text);
    match decoded.marks.as_slice() {
        [mark] if mark.markdown_range == Some(0..text.chars().count()) => {
            mark.as_mention().cloned()
        }
        _ => None,
    }
}

/// Host-side lookup of display names for mention ids.
pub trait MentionResolver {
    /// Resolve the display name of `id`.
    fn resolve(&self, id: &str, mention_type: MentionType) -> Result<String, EditorError>;
}

impl<F> MentionResolver for F
where
    F: Fn(&str, MentionType) -> Result<String, EditorError>,
{
    fn resolve(&self, id: &str, mention_type: MentionType) -> Result<String, EditorError> {
        self(id, mention_type)
    }
}
