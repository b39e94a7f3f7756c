//! Backing tag-store abstraction.
//!
//! The engine consumes exactly three capabilities from whatever system owns
//! the taxonomy, expressed here as one object-safe trait so the service can
//! be handed any implementation: the bundled HTTP client, a database
//! adapter, or an in-process fixture in tests.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{MatchResult, Tag, TagDecision};

#[cfg(feature = "http-store")]
mod http;

#[cfg(feature = "http-store")]
pub use http::{HttpStoreConfig, HttpTagStore};

/// The operations the matching engine consumes from the backing store.
///
/// `match_tags` is the remote matching procedure tried before the local
/// cascade; both an empty result and an error defer to the cascade.
/// `list_tags` feeds the category cache. `append_decision` is the
/// fire-and-forget analytics sink.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Server-side matching for `text` within `category`.
    ///
    /// Implementations are expected to cover at least exact and synonym
    /// matching, and may apply methods the local cascade cannot (reported
    /// as [`MatchMethod::Nlp`](crate::types::MatchMethod::Nlp)).
    async fn match_tags(
        &self,
        text: &str,
        category: &str,
        min_confidence: f32,
    ) -> Result<Vec<MatchResult>, StoreError>;

    /// Full tag listing for one category.
    async fn list_tags(&self, category: &str) -> Result<Vec<Tag>, StoreError>;

    /// Persist one decision record, returning its store-assigned id.
    async fn append_decision(&self, decision: &TagDecision) -> Result<String, StoreError>;
}
