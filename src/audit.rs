//! Fire-and-forget decision logging.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::store::TagStore;
use crate::types::TagDecision;

/// Best-effort writer of [`TagDecision`] records for downstream analytics.
///
/// A broken analytics sink must never take the matching path down with it:
/// failures are logged and swallowed, and the detached variant returns
/// before the write even starts.
#[derive(Clone)]
pub struct DecisionLogger {
    store: Arc<dyn TagStore>,
}

impl DecisionLogger {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    /// Write one record, returning its store-assigned id, or `None` on any
    /// failure.
    pub async fn log(&self, decision: &TagDecision) -> Option<String> {
        match self.store.append_decision(decision).await {
            Ok(id) => {
                debug!(category = %decision.category_name, decision_id = %id, "decision_logged");
                Some(id)
            }
            Err(err) => {
                warn!(
                    category = %decision.category_name,
                    error = %err,
                    "decision_log_failure"
                );
                None
            }
        }
    }

    /// Queue a record on the current runtime and return immediately.
    ///
    /// The write happens on a detached task; callers hand results back to
    /// their users without waiting on the sink. Must be called from within
    /// a tokio runtime.
    pub fn log_detached(&self, decision: TagDecision) {
        let logger = self.clone();
        tokio::spawn(async move {
            logger.log(&decision).await;
        });
    }
}
