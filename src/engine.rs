//! The local match cascade: exact → synonym → fuzzy over one category's tags.

use crate::normalize::normalize;
use crate::similarity::similarity;
use crate::types::{MatchMethod, MatchResult, MatchingOptions, Tag};

/// Fixed confidence for synonym hits: below exact, above any fuzzy score a
/// sane threshold would accept.
pub const SYNONYM_CONFIDENCE: f32 = 0.95;

/// Rank `tags` against already-normalized query text.
///
/// Each tag contributes at most one result, from the strongest method that
/// applies to it: an exact hit on the normalized name (confidence 1.0) wins
/// outright and ends the cascade for that tag, otherwise a hit on a
/// normalized synonym ([`SYNONYM_CONFIDENCE`]), otherwise an edit-distance
/// score of at least `options.min_confidence`. Results come back ordered by
/// confidence descending; truncation to `max_results` is the delegation
/// layer's job, not the cascade's.
///
/// Ties keep their scan order (stable sort), but callers should not rely on
/// that.
pub fn match_locally(
    normalized_text: &str,
    tags: &[Tag],
    options: &MatchingOptions,
) -> Vec<MatchResult> {
    let mut results = Vec::new();

    for tag in tags {
        if tag.normalized_name == normalized_text {
            results.push(candidate(tag, 1.0, MatchMethod::Exact));
            continue;
        }

        if options.enable_synonym_matching
            && !tag.synonyms.is_empty()
            && tag.synonyms.iter().any(|s| normalize(s) == normalized_text)
        {
            results.push(candidate(tag, SYNONYM_CONFIDENCE, MatchMethod::Synonym));
            continue;
        }

        if options.enable_fuzzy_matching {
            let score = similarity(normalized_text, &tag.normalized_name);
            if score >= options.min_confidence {
                results.push(candidate(tag, score, MatchMethod::Fuzzy));
            }
        }
    }

    results.sort_by(|a, b| {
        b.confidence_score
            .partial_cmp(&a.confidence_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

fn candidate(tag: &Tag, confidence: f32, method: MatchMethod) -> MatchResult {
    MatchResult {
        tag_id: tag.id.clone(),
        tag_name: tag.name.clone(),
        confidence_score: confidence,
        matching_method: method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, name: &str, synonyms: &[&str]) -> Tag {
        Tag {
            id: id.into(),
            name: name.into(),
            normalized_name: normalize(name),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            confidence_threshold: 0.7,
        }
    }

    fn finishes() -> Vec<Tag> {
        vec![
            tag("t-matte", "Matte", &["flat", "non-glossy"]),
            tag("t-gloss", "Gloss", &["shiny"]),
            tag("t-satin", "Satin", &[]),
        ]
    }

    #[test]
    fn exact_match_scores_one() {
        let results = match_locally("matte", &finishes(), &MatchingOptions::default());
        assert_eq!(results[0].tag_id, "t-matte");
        assert_eq!(results[0].confidence_score, 1.0);
        assert_eq!(results[0].matching_method, MatchMethod::Exact);
    }

    #[test]
    fn synonym_match_scores_fixed_confidence() {
        let results = match_locally("flat", &finishes(), &MatchingOptions::default());
        let hit = results
            .iter()
            .find(|r| r.tag_id == "t-matte")
            .expect("matte should match via synonym");
        assert_eq!(hit.confidence_score, SYNONYM_CONFIDENCE);
        assert_eq!(hit.matching_method, MatchMethod::Synonym);
    }

    #[test]
    fn synonyms_are_normalized_before_comparison() {
        let tags = vec![tag("t-matte", "Matte", &["  Non-Glossy  "])];
        let results = match_locally("non-glossy", &tags, &MatchingOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matching_method, MatchMethod::Synonym);
    }

    #[test]
    fn fuzzy_match_reports_similarity_score() {
        let options = MatchingOptions {
            min_confidence: 0.5,
            ..MatchingOptions::default()
        };
        let results = match_locally("matt", &finishes(), &options);
        let hit = results
            .iter()
            .find(|r| r.tag_id == "t-matte")
            .expect("one-edit query should fuzzy-match matte");
        assert_eq!(hit.matching_method, MatchMethod::Fuzzy);
        assert!((hit.confidence_score - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn a_tag_is_reported_at_most_once() {
        // "matte" is exact for t-matte; neither synonym nor fuzzy may add a
        // second entry for the same tag.
        let options = MatchingOptions {
            min_confidence: 0.0,
            ..MatchingOptions::default()
        };
        let results = match_locally("matte", &finishes(), &options);
        let matte_hits = results.iter().filter(|r| r.tag_id == "t-matte").count();
        assert_eq!(matte_hits, 1);
        assert_eq!(results[0].matching_method, MatchMethod::Exact);
    }

    #[test]
    fn disabled_synonym_matching_skips_synonyms() {
        let options = MatchingOptions {
            enable_synonym_matching: false,
            enable_fuzzy_matching: false,
            ..MatchingOptions::default()
        };
        let results = match_locally("flat", &finishes(), &options);
        assert!(results.is_empty());
    }

    #[test]
    fn disabled_fuzzy_matching_skips_fuzzy() {
        let options = MatchingOptions {
            enable_fuzzy_matching: false,
            min_confidence: 0.0,
            ..MatchingOptions::default()
        };
        let results = match_locally("matt", &finishes(), &options);
        assert!(results.is_empty());
    }

    #[test]
    fn results_are_sorted_by_confidence_descending() {
        let tags = vec![
            tag("t-satin", "Satin", &[]),
            tag("t-matte", "Matte", &["flatte"]),
            tag("t-mat", "Mat", &[]),
        ];
        let options = MatchingOptions {
            min_confidence: 0.3,
            ..MatchingOptions::default()
        };
        let results = match_locally("matte", &tags, &options);
        assert!(results.len() >= 2);
        for pair in results.windows(2) {
            assert!(pair[0].confidence_score >= pair[1].confidence_score);
        }
        assert_eq!(results[0].tag_id, "t-matte");
    }

    #[test]
    fn cascade_does_not_truncate() {
        let tags: Vec<Tag> = (0..20)
            .map(|i| tag(&format!("t-{i}"), &format!("matte{i}"), &[]))
            .collect();
        let options = MatchingOptions {
            min_confidence: 0.5,
            max_results: 2,
            ..MatchingOptions::default()
        };
        let results = match_locally("matte0", &tags, &options);
        // max_results applies one level up; every qualifying tag is here.
        assert!(results.len() > 2);
    }

    #[test]
    fn below_threshold_candidates_are_dropped() {
        let options = MatchingOptions {
            min_confidence: 0.9,
            ..MatchingOptions::default()
        };
        let results = match_locally("zzz", &finishes(), &options);
        assert!(results.is_empty());
    }
}
