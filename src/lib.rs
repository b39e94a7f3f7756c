//! Taxonomy tag matching for free-form text.
//!
//! Material catalogs accumulate text from everywhere (PDF spec sheets,
//! supplier CSVs, OCR) and none of it spells things the way the taxonomy
//! does. This crate takes a piece of extracted text plus a category name
//! ("finishes", "colors", ...) and resolves it to ranked, confidence-scored
//! canonical tags.
//!
//! ## How a request resolves
//!
//! 1. Blank input is rejected softly: you get an empty result and a log
//!    line, never an error.
//! 2. The backing store's own matcher gets the first shot. If it answers,
//!    those results win.
//! 3. If it returns nothing, or fails entirely, we fall back to the local
//!    cascade: exact match on the normalized name, then synonyms, then
//!    edit-distance similarity, over a TTL-cached copy of the category's
//!    tags.
//!
//! The nice thing is the failure behavior: a backend outage degrades to
//! local matching instead of failing the request. The only error callers
//! ever see is the one with no remaining fallback: a cache miss that the
//! store cannot fill.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tagmatch::{HttpStoreConfig, HttpTagStore, TagMatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(HttpTagStore::new(HttpStoreConfig {
//!         base_url: "https://tags.internal.example.com".into(),
//!         ..HttpStoreConfig::default()
//!     }));
//!     let matcher = TagMatcher::with_defaults(store);
//!
//!     let options = matcher.default_options();
//!     let hits = matcher
//!         .find_matching_tags("Brushed  NICKEL", "finishes", &options)
//!         .await?;
//!     for hit in hits {
//!         println!("{} ({:?}, {:.2})", hit.tag_name, hit.matching_method, hit.confidence_score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Any backend works: implement [`TagStore`] and hand the matcher an
//! `Arc<dyn TagStore>`. Tests do exactly that with in-process fixtures.

pub mod audit;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod similarity;
pub mod service;
pub mod store;
pub mod types;

pub use crate::audit::DecisionLogger;
pub use crate::cache::{CacheStats, CategoryCache, DEFAULT_TAG_TTL};
pub use crate::config::{
    CacheSettings, ConfigError, MatcherConfig, MatchingSettings, StoreSettings,
};
pub use crate::engine::{SYNONYM_CONFIDENCE, match_locally};
pub use crate::error::{MatchError, StoreError};
pub use crate::metrics::{MatchObserver, MatchPath, set_match_observer};
pub use crate::normalize::normalize;
pub use crate::service::{BackingReport, DEFAULT_CATEGORIES, TagMatcher};
pub use crate::similarity::{edit_distance, similarity};
pub use crate::store::TagStore;
#[cfg(feature = "http-store")]
pub use crate::store::{HttpStoreConfig, HttpTagStore};
pub use crate::types::{MatchMethod, MatchResult, MatchingOptions, Tag, TagDecision};
