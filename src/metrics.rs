// Metrics hooks for the matching service.
//
// Callers install a global `MatchObserver` implementation via
// [`set_match_observer`], then `TagMatcher` reports per-request latency and
// result counts for each call to `find_matching_tags`. This keeps
// instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// How a request was ultimately resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPath {
    /// The backing store's matcher produced the results.
    Remote,
    /// The local cascade produced the results.
    Local,
    /// Input validation rejected the request before any matching ran.
    Rejected,
}

/// Metrics observer for match operations.
pub trait MatchObserver: Send + Sync {
    /// Record the outcome of one matching request.
    ///
    /// `category` is the taxonomy partition that was searched, `path` is how
    /// the request resolved, `latency` is the wall-clock duration of the
    /// whole call, and `result_count` is the number of results returned to
    /// the caller after truncation.
    fn record_match(&self, category: &str, path: MatchPath, latency: Duration, result_count: usize);
}

fn observer_lock() -> &'static RwLock<Option<Arc<dyn MatchObserver>>> {
    static OBSERVER: OnceCell<RwLock<Option<Arc<dyn MatchObserver>>>> = OnceCell::new();
    OBSERVER.get_or_init(|| RwLock::new(None))
}

pub(crate) fn observer() -> Option<Arc<dyn MatchObserver>> {
    let guard = observer_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global match observer.
///
/// Typically called once during service startup so every `TagMatcher`
/// instance reports to the same backend.
pub fn set_match_observer(recorder: Option<Arc<dyn MatchObserver>>) {
    let lock = observer_lock();
    let mut guard = lock.write().expect("match observer lock poisoned");
    *guard = recorder;
}
