use engine::Workflow;

use super::Scorer;
use crate::similarity::similarity;
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const WEIGHT: f64 = 0.7;

/// Fuzzy comparison against the workflow's stored example phrasings.
#[derive(Debug)]
pub struct ExampleScorer {
    /// Similarities at or below this are ignored.
    floor: f64,
}

impl ExampleScorer {
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }
}

impl Default for ExampleScorer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Scorer for ExampleScorer {
    fn name(&self) -> &'static str {
        "examples"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        let query = query.raw.trim().to_lowercase();

        // First example wins ties.
        let (example, best) = workflow
            .examples
            .iter()
            .map(|example| (example, similarity(&query, &example.trim().to_lowercase())))
            .fold(None, |best: Option<(&String, f64)>, (example, sim)| match best {
                Some((_, top)) if top >= sim => best,
                _ => Some((example, sim)),
            })?;

        (best > self.floor).then(|| {
            MatchCandidate::new(
                workflow.id,
                best * WEIGHT,
                MatchKind::Similar,
                format!("resembles example '{example}' ({:.0}% similar)", best * 100.0),
            )
        })
    }
}
