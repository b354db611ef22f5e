//! Match candidates and their ranking order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a candidate relates to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Partial,
    Similar,
    NaturalLanguage,
}

impl MatchKind {
    /// Lower ranks win ties on confidence.
    fn rank(self) -> u8 {
        match self {
            MatchKind::Exact => 0,
            MatchKind::Partial => 1,
            MatchKind::Similar => 2,
            MatchKind::NaturalLanguage => 3,
        }
    }
}

/// One library workflow proposed as an answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub workflow_id: Uuid,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub reason: String,
    pub kind: MatchKind,
    /// Query characters explained by the match; breaks ties between
    /// partial matches.
    pub matched_len: usize,
}

impl MatchCandidate {
    pub fn new(workflow_id: Uuid, confidence: f64, kind: MatchKind, reason: impl Into<String>) -> Self {
        Self {
            workflow_id,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
            kind,
            matched_len: 0,
        }
    }

    pub fn with_matched_len(mut self, matched_len: usize) -> Self {
        self.matched_len = matched_len;
        self
    }
}

/// Ranking comparator: higher confidence first, then Exact before Partial
/// before Similar before NaturalLanguage, then longer matched text first.
pub fn compare_candidates(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
        .then_with(|| b.matched_len.cmp(&a.matched_len))
}
