//! Tiered mention cache: recently used, mentioned in this document, and
//! everything resolved so far.

use super::{MentionEntity, MentionResolver};
use crate::config::EditorConfig;
use crate::constants::{
    MENTION_SEARCH_DOCUMENT_LIMIT, MENTION_SEARCH_MAX_RESULTS, MENTION_SEARCH_RECENT_LIMIT,
};
use crate::models::mark::{Mention, MentionType};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};

type EntityKey = (MentionType, String);

#[derive(Debug, Clone)]
struct CacheEntry {
    entity: MentionEntity,
    cached_at: DateTime<Utc>,
}

/// Sizes of each cache tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub cached: usize,
    pub recent: usize,
    /// Documents with at least one recorded mention.
    pub documents: usize,
}

/// Name cache in front of a [`MentionResolver`].
#[derive(Debug, Clone)]
pub struct MentionCache {
    entries: HashMap<EntityKey, CacheEntry>,
    recent: VecDeque<MentionEntity>,
    documents: HashMap<String, Vec<MentionEntity>>,
    ttl_secs: i64,
    max_recent: usize,
}

impl Default for MentionCache {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

fn key(mention_type: MentionType, id: &str) -> EntityKey {
    (mention_type, id.to_string())
}

impl MentionCache {
    pub fn new(ttl_secs: u64, max_recent: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recent: VecDeque::new(),
            documents: HashMap::new(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            max_recent,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.mention_cache_ttl_secs, config.max_recent_mentions)
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        (now - entry.cached_at).num_seconds() < self.ttl_secs
    }

    /// Store a resolved entity.
    pub fn insert(&mut self, entity: MentionEntity, now: DateTime<Utc>) {
        self.entries.insert(
            key(entity.mention_type, &entity.id),
            CacheEntry {
                entity,
                cached_at: now,
            },
        );
    }

    /// Cached name for an id, if the entry has not expired.
    pub fn cached_name(
        &self,
        mention_type: MentionType,
        id: &str,
        now: DateTime<Utc>,
    ) -> Option<&str> {
        self.entries
            .get(&key(mention_type, id))
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.entity.name.as_str())
    }

    /// Resolve the display name of a stable id, consulting the cache first.
    ///
    /// # Returns
    /// The name, or `None` when the resolver fails. Failures are logged and
    /// never cached.
    pub fn resolve(
        &mut self,
        mention_type: MentionType,
        id: &str,
        resolver: &dyn MentionResolver,
        now: DateTime<Utc>,
    ) -> Option<String> {
        if let Some(name) = self.cached_name(mention_type, id, now) {
            return Some(name.to_string());
        }
        match resolver.resolve(id, mention_type) {
            Ok(name) => {
                tracing::debug!(%mention_type, id, "resolved mention");
                self.insert(MentionEntity::new(mention_type, id, name.as_str()), now);
                Some(name)
            }
            Err(err) => {
                tracing::warn!(%mention_type, id, error = %err, "mention resolution failed");
                None
            }
        }
    }

    /// Set `display_name` on a mention from the cache.
    ///
    /// Legacy mentions carry their name literally and are left alone.
    pub fn annotate(&self, mention: &mut Mention, now: DateTime<Utc>) {
        if !mention.is_stable_id {
            return;
        }
        if let Some(name) = self.cached_name(mention.mention_type, &mention.id, now) {
            mention.display_name = Some(name.to_string());
        }
    }

    /// Record that `entity` was just inserted into `document_id`.
    ///
    /// Moves it to the front of the recent tier, adds it to the document tier
    /// and refreshes its cache entry.
    pub fn record_usage(
        &mut self,
        mut entity: MentionEntity,
        document_id: &str,
        now: DateTime<Utc>,
    ) {
        entity.last_used = Some(now);
        let same = |seen: &MentionEntity| {
            seen.mention_type == entity.mention_type && seen.id == entity.id
        };
        self.recent.retain(|seen| !same(seen));
        self.recent.push_front(entity.clone());
        self.recent.truncate(self.max_recent);

        let mentioned = self.documents.entry(document_id.to_string()).or_default();
        mentioned.retain(|seen| !same(seen));
        mentioned.push(entity.clone());
        self.insert(entity, now);
    }

    /// Replace the entities known to be mentioned in `document_id`.
    pub fn set_document_entities(
        &mut self,
        document_id: &str,
        entities: impl IntoIterator<Item = MentionEntity>,
    ) {
        self.documents
            .insert(document_id.to_string(), entities.into_iter().collect());
    }

    pub fn recent(&self) -> impl Iterator<Item = &MentionEntity> {
        self.recent.iter()
    }

    /// Local suggestions for a mention query.
    ///
    /// Matches are case-insensitive substrings of the entity name. Up to three
    /// come from recent usage, up to four from `document_id`, and the cache
    /// fills the rest; duplicates keep their first tier.
    pub fn search_local(&self, query: &str, document_id: Option<&str>) -> Vec<MentionEntity> {
        let needle = query.to_lowercase();
        let matches = |entity: &&MentionEntity| entity.name.to_lowercase().contains(&needle);
        let document: &[MentionEntity] = document_id
            .and_then(|id| self.documents.get(id))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut seen: HashSet<EntityKey> = HashSet::new();
        let mut results = Vec::new();
        let mut take = |entity: &MentionEntity, results: &mut Vec<MentionEntity>| {
            if seen.insert(key(entity.mention_type, &entity.id)) {
                results.push(entity.clone());
                true
            } else {
                false
            }
        };

        let mut taken = 0;
        for entity in self.recent.iter().filter(matches) {
            if taken == MENTION_SEARCH_RECENT_LIMIT {
                break;
            }
            if take(entity, &mut results) {
                taken += 1;
            }
        }
        taken = 0;
        for entity in document.iter().filter(matches) {
            if taken == MENTION_SEARCH_DOCUMENT_LIMIT {
                break;
            }
            if take(entity, &mut results) {
                taken += 1;
            }
        }
        let mut cached: Vec<&MentionEntity> = self
            .entries
            .values()
            .map(|entry| &entry.entity)
            .filter(matches)
            .collect();
        cached.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        for entity in cached {
            if results.len() >= MENTION_SEARCH_MAX_RESULTS {
                break;
            }
            take(entity, &mut results);
        }
        results.truncate(MENTION_SEARCH_MAX_RESULTS);
        results
    }

    /// Drop expired cache entries.
    ///
    /// # Returns
    /// How many entries were removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl_secs = self.ttl_secs;
        self.entries
            .retain(|_, entry| (now - entry.cached_at).num_seconds() < ttl_secs);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired mention cache entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached: self.entries.len(),
            recent: self.recent.len(),
            documents: self.documents.len(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recent.clear();
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().expect("timestamp")
    }

    fn user(id: &str, name: &str) -> MentionEntity {
        MentionEntity::new(MentionType::User, id, name)
    }

    #[test]
    fn resolve_hits_cache_until_ttl() {
        let calls = Cell::new(0);
        let resolver = |id: &str, _: MentionType| -> Result<String, EditorError> {
            calls.set(calls.get() + 1);
            Ok(format!("name-{}", id))
        };
        let mut cache = MentionCache::new(300, 10);

        assert_eq!(
            cache.resolve(MentionType::User, "42", &resolver, at(0)),
            Some("name-42".to_string())
        );
        assert_eq!(
            cache.resolve(MentionType::User, "42", &resolver, at(299)),
            Some("name-42".to_string())
        );
        assert_eq!(calls.get(), 1);

        cache.resolve(MentionType::User, "42", &resolver, at(300));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failed_resolution_is_not_cached() {
        let resolver = |_: &str, _: MentionType| -> Result<String, EditorError> {
            Err(EditorError::MentionResolution("offline".to_string()))
        };
        let mut cache = MentionCache::default();
        assert_eq!(cache.resolve(MentionType::Page, "p1", &resolver, at(0)), None);
        assert_eq!(cache.stats().cached, 0);
    }

    #[test]
    fn annotate_only_touches_stable_mentions() {
        let mut cache = MentionCache::default();
        cache.insert(user("42", "Ada"), at(0));
        cache.insert(user("bob", "Robert"), at(0));

        let mut stable = Mention::stable(MentionType::User, "42");
        cache.annotate(&mut stable, at(1));
        assert_eq!(stable.display_name.as_deref(), Some("Ada"));

        let mut legacy = Mention::legacy(MentionType::User, "bob");
        cache.annotate(&mut legacy, at(1));
        assert_eq!(legacy.display_name, None);
    }

    #[test]
    fn record_usage_keeps_recent_bounded_and_unique() {
        let mut cache = MentionCache::new(300, 3);
        for idx in 0..5 {
            cache.record_usage(user(&idx.to_string(), "u"), "doc", at(idx));
        }
        cache.record_usage(user("3", "u"), "doc", at(10));
        let order: Vec<&str> = cache.recent().map(|entity| entity.id.as_str()).collect();
        assert_eq!(order, vec!["3", "4", "2"]);
        assert_eq!(cache.recent().next().and_then(|e| e.last_used), Some(at(10)));
        assert_eq!(cache.stats().documents, 1);
        assert_eq!(cache.search_local("u", Some("doc")).len(), 5);
    }

    #[test]
    fn search_respects_tier_limits_and_dedupes() {
        let mut cache = MentionCache::new(300, 10);
        for idx in 0..5 {
            let entity = user(&format!("r{}", idx), &format!("Anna {}", idx));
            cache.record_usage(entity, "other", at(0));
        }
        cache.set_document_entities("doc", (0..6).map(|idx| user(&format!("d{}", idx), "Annabel")));
        for idx in 0..6 {
            cache.insert(user(&format!("g{}", idx), "Hannah"), at(0));
        }

        let results = cache.search_local("ANN", Some("doc"));
        assert_eq!(results.len(), MENTION_SEARCH_MAX_RESULTS);
        let ids: Vec<&str> = results.iter().map(|entity| entity.id.as_str()).collect();
        assert_eq!(&ids[..3], &["r4", "r3", "r2"]);
        assert_eq!(&ids[3..7], &["d0", "d1", "d2", "d3"]);
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());

        assert!(cache.search_local("zed", None).is_empty());
        assert_eq!(cache.search_local("annabel", None).len(), 0);
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let mut cache = MentionCache::new(60, 10);
        cache.insert(user("old", "Old"), at(0));
        cache.insert(user("new", "New"), at(0) + Duration::seconds(50));
        assert_eq!(cache.sweep_expired(at(70)), 1);
        assert_eq!(cache.stats().cached, 1);
        assert!(cache.cached_name(MentionType::User, "new", at(70)).is_some());
    }
}
