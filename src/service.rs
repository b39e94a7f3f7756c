//! Remote-first tag resolution with local cascade fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::DecisionLogger;
use crate::cache::{CacheStats, CategoryCache};
use crate::config::MatcherConfig;
use crate::engine::match_locally;
use crate::error::{MatchError, StoreError};
use crate::metrics::{MatchPath, observer};
use crate::normalize::normalize;
use crate::store::TagStore;
use crate::types::{MatchMethod, MatchResult, MatchingOptions, TagDecision};

/// Categories probed when the caller does not name their own set.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "colors",
    "material_types",
    "finishes",
    "collections",
    "technical_specs",
];

/// Outcome of the remote matching attempt.
///
/// The remote stage can only hand results onward or defer to the cascade;
/// its failures never leave this type. Spelling the contract out as a value
/// keeps the fall-through visible instead of buried in a catch.
enum RemoteOutcome {
    Matched(Vec<MatchResult>),
    Deferred(Option<StoreError>),
}

/// Health probe outcome for the three backing store operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackingReport {
    pub is_valid: bool,
    /// Operations the store reports as not implemented.
    pub missing_functions: Vec<String>,
    /// Failures other than a missing implementation.
    pub errors: Vec<String>,
}

/// The tag matching service.
///
/// Owns the category cache and the decision logger, and delegates to an
/// injected [`TagStore`]. Construct one per store and share it; there is no
/// process-global instance, so lifecycle (create, [`clear_cache`], drop)
/// stays in the caller's hands.
///
/// [`clear_cache`]: TagMatcher::clear_cache
pub struct TagMatcher {
    store: Arc<dyn TagStore>,
    cache: CategoryCache,
    logger: DecisionLogger,
    defaults: MatchingOptions,
    categories: Vec<String>,
}

impl TagMatcher {
    /// Build a matcher over `store`, taking cache TTL, default options, and
    /// the default category set from `config`.
    pub fn new(store: Arc<dyn TagStore>, config: &MatcherConfig) -> Self {
        Self {
            cache: CategoryCache::new(Duration::from_secs(config.cache.ttl_secs)),
            logger: DecisionLogger::new(store.clone()),
            defaults: config.matching.to_options(),
            categories: config.categories.clone(),
            store,
        }
    }

    /// Matcher with built-in defaults for everything but the store.
    pub fn with_defaults(store: Arc<dyn TagStore>) -> Self {
        Self::new(store, &MatcherConfig::default())
    }

    /// Matcher wired to the HTTP store described by `config.store`.
    #[cfg(feature = "http-store")]
    pub fn from_config(config: &MatcherConfig) -> Self {
        let store = Arc::new(crate::store::HttpTagStore::new(
            config.store.to_http_config(),
        ));
        Self::new(store, config)
    }

    /// The per-request options implied by the service configuration.
    pub fn default_options(&self) -> MatchingOptions {
        self.defaults.clone()
    }

    /// Resolve `extracted_text` to ranked tag candidates within `category`.
    ///
    /// Blank text or category is rejected softly: a warning and an empty
    /// result, never an error. The backing store's matcher is tried first;
    /// an empty or failed remote attempt falls through to the local cascade
    /// over the cached category listing. Output is truncated to
    /// `options.max_results`.
    ///
    /// The only hard failure is a cache miss that cannot be filled: at that
    /// point no fallback remains and the fetch error is returned as
    /// [`MatchError::TagFetch`].
    pub async fn find_matching_tags(
        &self,
        extracted_text: &str,
        category: &str,
        options: &MatchingOptions,
    ) -> Result<Vec<MatchResult>, MatchError> {
        options.validate()?;
        let start = Instant::now();

        if extracted_text.trim().is_empty() || category.trim().is_empty() {
            warn!(category, "blank text or category, skipping match");
            record(category, MatchPath::Rejected, start, 0);
            return Ok(Vec::new());
        }

        match self.try_remote(extracted_text, category, options).await {
            RemoteOutcome::Matched(mut results) => {
                results.truncate(options.max_results);
                debug!(category, result_count = results.len(), "remote_match");
                record(category, MatchPath::Remote, start, results.len());
                Ok(results)
            }
            RemoteOutcome::Deferred(reason) => {
                if let Some(err) = reason {
                    warn!(category, error = %err, "remote match failed, falling back to local cascade");
                }

                let normalized = normalize(extracted_text);
                let tags = self
                    .cache
                    .tags_for(category, self.store.as_ref())
                    .await
                    .map_err(|source| MatchError::TagFetch {
                        category: category.to_string(),
                        source,
                    })?;

                let mut results = match_locally(&normalized, &tags, options);
                results.truncate(options.max_results);
                debug!(category, result_count = results.len(), "local_match");
                record(category, MatchPath::Local, start, results.len());
                Ok(results)
            }
        }
    }

    async fn try_remote(
        &self,
        text: &str,
        category: &str,
        options: &MatchingOptions,
    ) -> RemoteOutcome {
        match self
            .store
            .match_tags(text, category, options.min_confidence)
            .await
        {
            Ok(results) if !results.is_empty() => RemoteOutcome::Matched(results),
            Ok(_) => RemoteOutcome::Deferred(None),
            Err(err) => RemoteOutcome::Deferred(Some(err)),
        }
    }

    /// Run [`find_matching_tags`](Self::find_matching_tags) concurrently
    /// over `categories` and aggregate per category.
    ///
    /// Every requested category appears in the mapping, with an empty
    /// sequence when nothing matched. Lookups run with no ordering
    /// guarantee relative to each other; aggregation waits for all of them
    /// to settle, then a failure in any single lookup fails the whole call.
    /// Callers wanting partial tolerance should fan out per category
    /// themselves.
    pub async fn find_tags_for_all_categories(
        &self,
        extracted_text: &str,
        categories: &[String],
        options: &MatchingOptions,
    ) -> Result<HashMap<String, Vec<MatchResult>>, MatchError> {
        let lookups = categories.iter().map(|category| async move {
            let results = self
                .find_matching_tags(extracted_text, category, options)
                .await?;
            Ok::<_, MatchError>((category.clone(), results))
        });

        let mut aggregated = HashMap::with_capacity(categories.len());
        for settled in join_all(lookups).await {
            let (category, results) = settled?;
            aggregated.insert(category, results);
        }
        Ok(aggregated)
    }

    /// Same fan-out over the configured default category set.
    pub async fn find_tags_for_default_categories(
        &self,
        extracted_text: &str,
        options: &MatchingOptions,
    ) -> Result<HashMap<String, Vec<MatchResult>>, MatchError> {
        self.find_tags_for_all_categories(extracted_text, &self.categories, options)
            .await
    }

    /// Best-effort decision logging; never fails. See [`DecisionLogger`].
    pub async fn log_decision(&self, decision: &TagDecision) -> Option<String> {
        self.logger.log(decision).await
    }

    /// Fire-and-forget variant for request paths that must not wait on the
    /// analytics sink.
    pub fn log_decision_detached(&self, decision: TagDecision) {
        self.logger.log_detached(decision);
    }

    /// Probe whether the three backing operations are reachable and
    /// implemented. Operational tooling calls this; the matching path never
    /// does.
    pub async fn validate_backing_functions(&self) -> BackingReport {
        let mut missing = Vec::new();
        let mut errors = Vec::new();

        let match_probe = self
            .store
            .match_tags("connectivity probe", "health", 1.0)
            .await
            .map(|_| ());
        classify("match_tags", match_probe, &mut missing, &mut errors);

        let list_probe = self.store.list_tags("health").await.map(|_| ());
        classify("list_tags", list_probe, &mut missing, &mut errors);

        let probe_decision = TagDecision {
            material_id: None,
            extracted_text: "connectivity probe".into(),
            matched_tag_id: None,
            confidence_score: None,
            matching_method: MatchMethod::Exact,
            category_name: "health".into(),
            decided_at: Utc::now(),
        };
        let append_probe = self
            .store
            .append_decision(&probe_decision)
            .await
            .map(|_| ());
        classify("append_decision", append_probe, &mut missing, &mut errors);

        BackingReport {
            is_valid: missing.is_empty() && errors.is_empty(),
            missing_functions: missing,
            errors,
        }
    }

    /// Snapshot of the category cache, for observability endpoints.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached category listings; the next lookup per category
    /// re-fetches.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn classify(
    name: &str,
    outcome: Result<(), StoreError>,
    missing: &mut Vec<String>,
    errors: &mut Vec<String>,
) {
    match outcome {
        Ok(()) => {}
        Err(StoreError::Unavailable(detail)) => {
            warn!(operation = name, %detail, "backing function missing");
            missing.push(name.to_string());
        }
        Err(err) => errors.push(format!("{name}: {err}")),
    }
}

fn record(category: &str, path: MatchPath, start: Instant, result_count: usize) {
    if let Some(observer) = observer() {
        observer.record_match(category, path, start.elapsed(), result_count);
    }
}
