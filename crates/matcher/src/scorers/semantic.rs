use std::collections::BTreeSet;

use engine::Workflow;

use super::Scorer;
use crate::keywords::{content_words, groups_in};
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const MAX_CONFIDENCE: f64 = 0.85;
const DESCRIPTION_WEIGHT: f64 = 0.4;
const TAG_WEIGHT: f64 = 0.3;
const GROUP_WEIGHT: f64 = 0.3;

/// Natural-language relevance from the workflow's name, description, tags
/// and the fixed keyword groups.
#[derive(Debug, Default)]
pub struct SemanticScorer;

impl Scorer for SemanticScorer {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        if query.words.is_empty() {
            return None;
        }

        let query_words: BTreeSet<&str> = query.words.iter().map(String::as_str).collect();
        let described = content_words(&format!("{} {}", workflow.name, workflow.description));
        let described: BTreeSet<&str> = described.iter().map(String::as_str).collect();
        let overlap = query_words.intersection(&described).count() as f64 / query_words.len() as f64;

        let raw = query.raw.to_lowercase();
        let tag_hits = workflow
            .tags
            .iter()
            .filter(|tag| {
                let tag = tag.trim().to_lowercase();
                !tag.is_empty() && raw.contains(&tag)
            })
            .count();
        let tag_ratio = if workflow.tags.is_empty() {
            0.0
        } else {
            tag_hits as f64 / workflow.tags.len() as f64
        };

        let mut workflow_words = content_words(&workflow.description);
        workflow_words.extend(content_words(&workflow.name));
        workflow_words.extend(workflow.tags.iter().flat_map(|t| content_words(t)));
        let workflow_groups = groups_in(&workflow_words);
        let shared_groups: Vec<&str> = groups_in(&query.words)
            .into_iter()
            .filter(|g| workflow_groups.contains(g))
            .collect();
        let group_hit = if shared_groups.is_empty() { 0.0 } else { 1.0 };

        let combined =
            DESCRIPTION_WEIGHT * overlap + TAG_WEIGHT * tag_ratio + GROUP_WEIGHT * group_hit;
        if combined <= 0.0 {
            return None;
        }

        let mut reason = format!(
            "description overlap {:.0}%, {tag_hits}/{} tags",
            overlap * 100.0,
            workflow.tags.len()
        );
        if !shared_groups.is_empty() {
            reason.push_str(&format!(", topics: {}", shared_groups.join(", ")));
        }

        Some(MatchCandidate::new(
            workflow.id,
            MAX_CONFIDENCE * combined,
            MatchKind::NaturalLanguage,
            reason,
        ))
    }
}
