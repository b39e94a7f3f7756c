use thiserror::Error;

/// Errors surfaced by a [`TagStore`](crate::store::TagStore) implementation.
///
/// The variants matter more than the messages: the delegation layer swallows
/// every one of these on the remote-first path, the health probe treats
/// [`Unavailable`](StoreError::Unavailable) as "operation not implemented",
/// and only the cache-fill path lets them escape (wrapped in
/// [`MatchError::TagFetch`]).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached at all (DNS, connect, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The backend answered but rejected or failed the request.
    #[error("backend error: {0}")]
    Backend(String),
    /// The backend does not implement the requested operation.
    #[error("operation unavailable: {0}")]
    Unavailable(String),
    /// The response arrived but could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Errors produced by the matching service itself.
///
/// This is the only error type that crosses the engine boundary. Remote
/// matching failures and decision-log failures never appear here; they
/// degrade to the local cascade and to a dropped log line respectively.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Per-request options failed validation.
    #[error("invalid matching options: {0}")]
    InvalidOptions(String),
    /// The fallback cascade needed the category's tag list and the store
    /// could not provide it. No further strategy remains at that point.
    #[error("failed to load tags for category `{category}`: {source}")]
    TagFetch {
        category: String,
        #[source]
        source: StoreError,
    },
}
