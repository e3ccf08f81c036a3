//! Serializable summaries of match outcomes
//!
//! A [`MatchSnapshot`] flattens the interesting parts of a match outcome
//! into plain strings so it can be serialized, diffed, and pinned in tests
//! without dragging generic element and result types along.

use serde::{Deserialize, Serialize};

use crate::engine::MatchResult;
use crate::item::MatchItem;

/// Flat, serializable view of one match outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// `"match"` or `"miss"`.
    pub outcome: String,
    /// `start..next` of the match; empty on a miss.
    pub span: String,
    /// Debug form of each consumed element.
    pub matched: Vec<String>,
    /// Debug form of each realized result.
    pub results: Vec<String>,
}

impl MatchSnapshot {
    /// Snapshot of a miss.
    pub fn miss() -> Self {
        MatchSnapshot {
            outcome: "miss".to_string(),
            span: String::new(),
            matched: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Snapshot of a match spanning `start..next`, details still empty.
    pub fn matched_span(start: usize, next: usize) -> Self {
        MatchSnapshot {
            outcome: "match".to_string(),
            span: format!("{}..{}", start, next),
            matched: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn with_matched(mut self, element: String) -> Self {
        self.matched.push(element);
        self
    }

    pub fn with_result(mut self, value: String) -> Self {
        self.results.push(value);
        self
    }

    /// Pretty JSON form, for storing alongside test fixtures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot a successful item: span, consumed elements, realized results.
pub fn snapshot_from_item<I, R>(item: &MatchItem<I, R>) -> MatchSnapshot
where
    I: std::fmt::Debug,
    R: std::fmt::Debug + Clone,
{
    let mut snapshot = MatchSnapshot::matched_span(item.start(), item.next());
    for element in item.matched_elements() {
        snapshot = snapshot.with_matched(format!("{:?}", element));
    }
    for value in item.results().realize() {
        snapshot = snapshot.with_result(format!("{:?}", value));
    }
    snapshot
}

/// Snapshot a whole run outcome; a miss gets the fixed miss form.
pub fn snapshot_from_result<I, R>(result: &MatchResult<I, R>) -> MatchSnapshot
where
    I: std::fmt::Debug,
    R: std::fmt::Debug + Clone,
{
    match result.item() {
        Some(item) => snapshot_from_item(item),
        None => MatchSnapshot::miss(),
    }
}
