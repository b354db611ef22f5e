use engine::Workflow;

use super::{has_operations, Scorer};
use crate::query::canonical_pattern;
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const CONFIDENCE: f64 = 0.95;

/// Same expression shape with different numbers, e.g. `40+70` vs `4+7`.
#[derive(Debug, Default)]
pub struct PatternScorer;

impl Scorer for PatternScorer {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        if !has_operations(workflow) {
            return None;
        }
        let pattern = canonical_pattern(&workflow.graph.source_pattern);
        (pattern == query.pattern).then(|| {
            MatchCandidate::new(
                workflow.id,
                CONFIDENCE,
                MatchKind::Similar,
                format!("same structure '{pattern}'"),
            )
            .with_matched_len(query.normalized.chars().count())
        })
    }
}
