//! Ranking a workflow library against a query.

use std::collections::HashSet;

use engine::Workflow;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::candidate::{compare_candidates, MatchCandidate};
use crate::query::QueryFeatures;
use crate::scorers::{
    ExactScorer, ExampleScorer, OperationOverlapScorer, PartialScorer, PatternScorer, Scorer,
    SemanticScorer,
};

/// Matcher tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Candidates below this confidence are dropped.
    pub min_confidence: f64,
    pub max_results: usize,
    /// Minimum example similarity the fuzzy strategy accepts.
    pub fuzzy_floor: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.1,
            max_results: 10,
            fuzzy_floor: 0.5,
        }
    }
}

/// Runs every registered [`Scorer`] over a library and merges the results.
pub struct WorkflowMatcher {
    scorers: Vec<Box<dyn Scorer>>,
    config: MatcherConfig,
}

impl WorkflowMatcher {
    /// Matcher with the six built-in strategies, most specific first.
    pub fn new(config: MatcherConfig) -> Self {
        let scorers: Vec<Box<dyn Scorer>> = vec![
            Box::new(ExactScorer),
            Box::new(PartialScorer),
            Box::new(PatternScorer),
            Box::new(OperationOverlapScorer),
            Box::new(SemanticScorer),
            Box::new(ExampleScorer::new(config.fuzzy_floor)),
        ];
        Self { scorers, config }
    }

    /// Matcher with no strategies; add them with [`with_scorer`](Self::with_scorer).
    pub fn empty(config: MatcherConfig) -> Self {
        Self {
            scorers: Vec::new(),
            config,
        }
    }

    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorers.push(Box::new(scorer));
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Rank `library` against `query`, best first, at most one candidate per
    /// workflow.
    #[instrument(skip(self, library), fields(library = library.len()))]
    pub fn find_matches(&self, query: &str, library: &[Workflow]) -> Vec<MatchCandidate> {
        let features = QueryFeatures::extract(query);

        let mut candidates: Vec<MatchCandidate> = Vec::new();
        for scorer in &self.scorers {
            let before = candidates.len();
            candidates.extend(library.iter().filter_map(|wf| scorer.score(&features, wf)));
            trace!(
                scorer = scorer.name(),
                hits = candidates.len() - before,
                "scorer finished"
            );
        }

        // Stable: equal candidates keep strategy order, then library order.
        candidates.sort_by(compare_candidates);

        let mut seen = HashSet::new();
        candidates.retain(|c| seen.insert(c.workflow_id));
        candidates.retain(|c| c.confidence >= self.config.min_confidence);
        candidates.truncate(self.config.max_results);

        debug!(matches = candidates.len(), "matched query against library");
        candidates
    }
}

impl Default for WorkflowMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

/// [`WorkflowMatcher::find_matches`] with the default configuration.
pub fn find_matches(query: &str, library: &[Workflow]) -> Vec<MatchCandidate> {
    WorkflowMatcher::default().find_matches(query, library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchKind;

    struct Fixed(f64);

    impl Scorer for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn score(&self, _: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
            Some(MatchCandidate::new(workflow.id, self.0, MatchKind::Similar, "fixed"))
        }
    }

    fn library(n: usize) -> Vec<Workflow> {
        (0..n)
            .map(|i| Workflow::new(format!("wf{i}"), engine::compile(&format!("{i}+1")).unwrap()))
            .collect()
    }

    #[test]
    fn keeps_best_candidate_per_workflow() {
        let matcher = WorkflowMatcher::empty(MatcherConfig::default())
            .with_scorer(Fixed(0.3))
            .with_scorer(Fixed(0.7));
        let lib = library(2);

        let matches = matcher.find_matches("anything", &lib);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.confidence == 0.7));
        // Ties keep library order.
        assert_eq!(matches[0].workflow_id, lib[0].id);
    }

    #[test]
    fn applies_threshold_and_limit() {
        let config = MatcherConfig {
            min_confidence: 0.5,
            max_results: 3,
            ..MatcherConfig::default()
        };
        let low = WorkflowMatcher::empty(config.clone()).with_scorer(Fixed(0.2));
        assert!(low.find_matches("q", &library(4)).is_empty());

        let high = WorkflowMatcher::empty(config).with_scorer(Fixed(0.9));
        assert_eq!(high.find_matches("q", &library(5)).len(), 3);
    }

    #[test]
    fn empty_library_yields_nothing() {
        assert!(find_matches("4+7", &[]).is_empty());
    }
}
