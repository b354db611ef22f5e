use engine::Workflow;

use super::Scorer;
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const SAME_EXPRESSION: f64 = 0.99;
const SAME_VALUES: f64 = 0.98;

/// Same expression text, or the same multiset of literal values.
#[derive(Debug, Default)]
pub struct ExactScorer;

impl Scorer for ExactScorer {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        let matched_len = query.normalized.chars().count();

        if !query.normalized.is_empty() && query.normalized == workflow.graph.source_pattern {
            return Some(
                MatchCandidate::new(
                    workflow.id,
                    SAME_EXPRESSION,
                    MatchKind::Exact,
                    format!("expression '{}' matches exactly", workflow.graph.source_pattern),
                )
                .with_matched_len(matched_len),
            );
        }

        let mut literals = workflow.graph.literal_values();
        if query.numbers.is_empty() || literals.len() != query.numbers.len() {
            return None;
        }
        let mut numbers = query.numbers.clone();
        numbers.sort_by(f64::total_cmp);
        literals.sort_by(f64::total_cmp);

        (numbers == literals).then(|| {
            MatchCandidate::new(
                workflow.id,
                SAME_VALUES,
                MatchKind::Exact,
                format!("same input values as '{}'", workflow.graph.source_pattern),
            )
            .with_matched_len(matched_len)
        })
    }
}
