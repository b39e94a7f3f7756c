use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// A canonical taxonomy entry within one category.
///
/// Tags are owned by the backing store and read-only to this engine; the
/// store guarantees `normalized_name` is unique within its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Store-assigned identifier, unique across the store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Canonicalized form of `name` (see [`normalize`](crate::normalize)).
    pub normalized_name: String,
    /// Alternate spellings and trade names that resolve to this tag.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Per-tag acceptance floor. The backing store's matcher applies it;
    /// the local cascade honors only the request-level `min_confidence`.
    #[serde(default = "Tag::default_confidence_threshold")]
    pub confidence_threshold: f32,
}

impl Tag {
    pub(crate) fn default_confidence_threshold() -> f32 {
        0.7
    }
}

/// How a match was produced, in decreasing order of certainty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Normalized query equals the tag's normalized name.
    Exact,
    /// Normalized query equals one of the tag's normalized synonyms.
    Synonym,
    /// Edit-distance similarity cleared the request threshold.
    Fuzzy,
    /// Produced server-side by the backing store's matcher.
    Nlp,
}

/// A single ranked candidate for one piece of extracted text.
///
/// Immutable value object; result sets are ordered by `confidence_score`
/// descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub tag_id: String,
    pub tag_name: String,
    /// Match strength in `[0.0, 1.0]`.
    pub confidence_score: f32,
    pub matching_method: MatchMethod,
}

/// Per-request knobs for the cascade and the remote delegation.
///
/// Cheap to clone and serde-friendly so callers can embed it in their own
/// request types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingOptions {
    /// Minimum confidence a fuzzy candidate must reach to be reported.
    #[serde(default = "MatchingOptions::default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "MatchingOptions::default_enabled")]
    pub enable_fuzzy_matching: bool,
    #[serde(default = "MatchingOptions::default_enabled")]
    pub enable_synonym_matching: bool,
    /// Maximum number of results returned to the caller.
    #[serde(default = "MatchingOptions::default_max_results")]
    pub max_results: usize,
}

impl MatchingOptions {
    pub(crate) fn default_min_confidence() -> f32 {
        0.7
    }

    pub(crate) fn default_enabled() -> bool {
        true
    }

    pub(crate) fn default_max_results() -> usize {
        5
    }

    /// Validate the options for a single request.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MatchError::InvalidOptions(
                "min_confidence must be within 0.0..=1.0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(MatchError::InvalidOptions(
                "max_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchingOptions {
    fn default() -> Self {
        Self {
            min_confidence: Self::default_min_confidence(),
            enable_fuzzy_matching: Self::default_enabled(),
            enable_synonym_matching: Self::default_enabled(),
            max_results: Self::default_max_results(),
        }
    }
}

/// Append-only record of one matching decision, shipped to the store for
/// downstream analytics. The engine writes these and never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagDecision {
    /// Material the extracted text came from, when the caller knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    pub extracted_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_tag_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    pub matching_method: MatchMethod,
    pub category_name: String,
    /// When the decision was taken, not when the store persisted it.
    pub decided_at: DateTime<Utc>,
}

impl TagDecision {
    /// Record for a candidate the caller accepted.
    pub fn accepted(
        extracted_text: impl Into<String>,
        category: impl Into<String>,
        result: &MatchResult,
    ) -> Self {
        Self {
            material_id: None,
            extracted_text: extracted_text.into(),
            matched_tag_id: Some(result.tag_id.clone()),
            confidence_score: Some(result.confidence_score),
            matching_method: result.matching_method,
            category_name: category.into(),
            decided_at: Utc::now(),
        }
    }

    /// Attach the originating material.
    pub fn with_material(mut self, material_id: impl Into<String>) -> Self {
        self.material_id = Some(material_id.into());
        self
    }
}
