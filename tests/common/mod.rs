#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tagmatch::{MatchMethod, MatchResult, StoreError, Tag, TagDecision, TagStore, normalize};

/// Scripted in-process store: per-category tag fixtures, a scripted remote
/// response, and call counters for asserting which paths actually ran.
pub struct ScriptedStore {
    remote: Mutex<Result<Vec<MatchResult>, StoreError>>,
    tags: Mutex<HashMap<String, Result<Vec<Tag>, StoreError>>>,
    decision_outcome: Mutex<Result<String, StoreError>>,
    pub match_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub decisions: Mutex<Vec<TagDecision>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self {
            remote: Mutex::new(Ok(Vec::new())),
            tags: Mutex::new(HashMap::new()),
            decision_outcome: Mutex::new(Ok("decision-1".to_string())),
            match_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            decisions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_remote(self, outcome: Result<Vec<MatchResult>, StoreError>) -> Self {
        *self.remote.lock().unwrap() = outcome;
        self
    }

    pub fn with_tags(self, category: &str, tags: Vec<Tag>) -> Self {
        self.tags.lock().unwrap().insert(category.to_string(), Ok(tags));
        self
    }

    pub fn with_tag_failure(self, category: &str, err: StoreError) -> Self {
        self.tags.lock().unwrap().insert(category.to_string(), Err(err));
        self
    }

    pub fn with_decision_outcome(self, outcome: Result<String, StoreError>) -> Self {
        *self.decision_outcome.lock().unwrap() = outcome;
        self
    }

    pub fn match_call_count(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_decisions(&self) -> Vec<TagDecision> {
        self.decisions.lock().unwrap().clone()
    }
}

#[async_trait]
impl TagStore for ScriptedStore {
    async fn match_tags(
        &self,
        _text: &str,
        _category: &str,
        _min_confidence: f32,
    ) -> Result<Vec<MatchResult>, StoreError> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        self.remote.lock().unwrap().clone()
    }

    async fn list_tags(&self, category: &str) -> Result<Vec<Tag>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.tags
            .lock()
            .unwrap()
            .get(category)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn append_decision(&self, decision: &TagDecision) -> Result<String, StoreError> {
        self.decisions.lock().unwrap().push(decision.clone());
        self.decision_outcome.lock().unwrap().clone()
    }
}

/// Tag fixture with a canonicalized name derived from the display name.
pub fn tag(id: &str, name: &str, synonyms: &[&str]) -> Tag {
    Tag {
        id: id.into(),
        name: name.into(),
        normalized_name: normalize(name),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        confidence_threshold: 0.7,
    }
}

/// Remote-side result fixture.
pub fn remote_result(tag_id: &str, tag_name: &str, confidence: f32) -> MatchResult {
    MatchResult {
        tag_id: tag_id.into(),
        tag_name: tag_name.into(),
        confidence_score: confidence,
        matching_method: MatchMethod::Nlp,
    }
}

/// The standard finishes fixture used across suites.
pub fn finishes_fixture() -> Vec<Tag> {
    vec![
        tag("t-matte", "Matte", &["flat", "non-glossy"]),
        tag("t-gloss", "Gloss", &["shiny"]),
        tag("t-satin", "Satin", &[]),
    ]
}
