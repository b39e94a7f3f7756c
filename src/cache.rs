//! Read-through, TTL-checked cache of per-category tag listings.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::store::TagStore;
use crate::types::Tag;

/// Default validity window for a cached category listing.
pub const DEFAULT_TAG_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedCategory {
    tags: Vec<Tag>,
    fetched_at: Instant,
}

/// Cache summary for observability tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Categories currently held, fresh or stale.
    pub categories: usize,
    /// Total tags across all held categories.
    pub total_tags: usize,
    /// Age in seconds of the least recently refreshed entry.
    pub oldest_entry_secs: Option<u64>,
}

/// Per-category tag listings with lazy TTL checks.
///
/// Staleness is decided on read; there is no background sweep. A failed
/// refresh propagates to the caller and leaves any existing entry in place,
/// so the next read retries instead of serving a poisoned slot. Two
/// logically concurrent misses for the same category may both fetch;
/// refreshes are idempotent and the last write wins.
pub struct CategoryCache {
    entries: RwLock<HashMap<String, CachedCategory>>,
    ttl: Duration,
}

impl CategoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TAG_TTL)
    }

    /// Tags for `category`, served from cache while fresh and re-fetched
    /// from `store` otherwise.
    pub async fn tags_for(
        &self,
        category: &str,
        store: &dyn TagStore,
    ) -> Result<Vec<Tag>, StoreError> {
        if let Some(tags) = self.fresh_entry(category) {
            return Ok(tags);
        }

        let tags = store.list_tags(category).await?;
        debug!(category, tag_count = tags.len(), "category_tags_refreshed");

        let mut entries = self.entries.write().expect("category cache lock poisoned");
        entries.insert(
            category.to_string(),
            CachedCategory {
                tags: tags.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(tags)
    }

    fn fresh_entry(&self, category: &str) -> Option<Vec<Tag>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(category)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.tags.clone())
    }

    /// Drop every cached category.
    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("category cache lock poisoned");
        entries.clear();
    }

    /// Snapshot of the cache contents.
    pub fn stats(&self) -> CacheStats {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let oldest = entries
            .values()
            .map(|entry| entry.fetched_at.elapsed())
            .max();
        CacheStats {
            categories: entries.len(),
            total_tags: entries.values().map(|entry| entry.tags.len()).sum(),
            oldest_entry_secs: oldest.map(|age| age.as_secs()),
        }
    }
}
