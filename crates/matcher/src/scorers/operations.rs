use std::collections::BTreeSet;

use engine::Workflow;
use nodes::OperationKind;

use super::Scorer;
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const MAX_CONFIDENCE: f64 = 0.8;

/// Shared operations, scaled by `|common| / max(|query|, |workflow|)`.
#[derive(Debug, Default)]
pub struct OperationOverlapScorer;

impl Scorer for OperationOverlapScorer {
    fn name(&self) -> &'static str {
        "operations"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        let ops: BTreeSet<OperationKind> = workflow.graph.operations.iter().copied().collect();
        let common: Vec<String> = query
            .operations
            .intersection(&ops)
            .map(ToString::to_string)
            .collect();
        if common.is_empty() {
            return None;
        }

        let ratio = common.len() as f64 / query.operations.len().max(ops.len()) as f64;
        Some(MatchCandidate::new(
            workflow.id,
            MAX_CONFIDENCE * ratio,
            MatchKind::Similar,
            format!("shares {}", common.join(", ")),
        ))
    }
}
