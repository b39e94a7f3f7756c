//! Input canonicalization for query text and tag synonyms.
//!
//! Matching is only meaningful over a canonical form: the store keeps
//! `normalized_name` pre-canonicalized, and every piece of free-form text
//! entering the engine goes through [`normalize`] first so the two sides
//! compare like-for-like.

/// Lowercases, trims the edges, and collapses internal whitespace runs to
/// single ASCII spaces.
///
/// Total on any input: empty and whitespace-only strings normalize to the
/// empty string. Deterministic across runs, so normalized forms are safe to
/// use as comparison keys.
///
/// ```
/// use tagmatch::normalize;
///
/// assert_eq!(normalize("  Brushed   NICKEL \n"), "brushed nickel");
/// assert_eq!(normalize("   \t "), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(&segment.to_lowercase());
    }
    normalized
}
