//! Matching strategies.
//!
//! Each strategy is an independent [`Scorer`]; the matcher runs all of them
//! over the library and merges the results, so a strategy can be added,
//! dropped or reweighted without touching the ranking logic.

mod examples;
mod exact;
mod operations;
mod partial;
mod pattern;
mod semantic;

use engine::Workflow;

use crate::{MatchCandidate, QueryFeatures};

pub use examples::ExampleScorer;
pub use exact::ExactScorer;
pub use operations::OperationOverlapScorer;
pub use partial::PartialScorer;
pub use pattern::PatternScorer;
pub use semantic::SemanticScorer;

/// Scores one workflow against a query.
pub trait Scorer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// `None` when the strategy sees no relation.
    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate>;
}

/// True when the workflow's source contains at least one operator.
fn has_operations(workflow: &Workflow) -> bool {
    !workflow.graph.operations.is_empty()
}
