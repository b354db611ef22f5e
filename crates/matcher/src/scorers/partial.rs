use engine::Workflow;

use super::{has_operations, Scorer};
use crate::{MatchCandidate, MatchKind, QueryFeatures};

const BASE: f64 = 0.6;
const SPAN: f64 = 0.25;

/// The workflow's expression appears inside a longer query.
///
/// Confidence grows from 0.6 to 0.85 with the share of the query the
/// expression covers.
#[derive(Debug, Default)]
pub struct PartialScorer;

/// Part of a number or identifier.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// True when `needle` occurs in `haystack` without splitting a number or
/// identifier at either end, so `4+7` is not found in `14+72`.
fn contains_whole(haystack: &str, needle: &str) -> bool {
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().last()) else {
        return false;
    };
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        let clean_start = !(is_word_char(first) && before.is_some_and(is_word_char));
        let clean_end = !(is_word_char(last) && after.is_some_and(is_word_char));
        clean_start && clean_end
    })
}

impl Scorer for PartialScorer {
    fn name(&self) -> &'static str {
        "partial"
    }

    fn score(&self, query: &QueryFeatures, workflow: &Workflow) -> Option<MatchCandidate> {
        let source = workflow.graph.source_pattern.as_str();
        if source.is_empty()
            || !has_operations(workflow)
            || source == query.normalized
            || !contains_whole(&query.normalized, source)
        {
            return None;
        }

        let matched_len = source.chars().count();
        let coverage = matched_len as f64 / query.normalized.chars().count() as f64;

        Some(
            MatchCandidate::new(
                workflow.id,
                BASE + SPAN * coverage,
                MatchKind::Partial,
                format!("query contains '{source}' ({:.0}% coverage)", coverage * 100.0),
            )
            .with_matched_len(matched_len),
        )
    }
}
