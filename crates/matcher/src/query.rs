//! Features extracted once from a query and shared by every scorer.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use expr::TokenKind;
use nodes::OperationKind;
use regex::Regex;

use crate::keywords;

/// Placeholder that stands in for every number in a canonical pattern.
pub const NUMBER_PLACEHOLDER: &str = "N";

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"\b\d+(?:\.\d+)?").expect("number pattern is a valid regex"))
}

/// Replace every number in `text` with [`NUMBER_PLACEHOLDER`].
///
/// `canonical_pattern("4+7*2.5") == "N+N*N"`
pub fn canonical_pattern(text: &str) -> String {
    number_regex()
        .replace_all(text, NUMBER_PLACEHOLDER)
        .into_owned()
}

/// A query, pre-digested.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFeatures {
    pub raw: String,
    /// Lowercased, whitespace stripped.
    pub normalized: String,
    /// Numbers in order of appearance.
    pub numbers: Vec<f64>,
    /// Operations named by symbol or keyword.
    pub operations: BTreeSet<OperationKind>,
    /// `normalized` with numbers replaced by the placeholder.
    pub pattern: String,
    /// Lowercase content words.
    pub words: Vec<String>,
}

impl QueryFeatures {
    pub fn extract(query: &str) -> Self {
        let normalized = expr::normalize(query);
        let tokens = expr::tokenize(query);

        let numbers = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .filter_map(|t| t.value.parse::<f64>().ok())
            .collect();

        let words = keywords::content_words(query);

        let mut operations: BTreeSet<OperationKind> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .filter_map(|t| t.value.chars().next().and_then(OperationKind::from_symbol))
            .collect();
        operations.extend(keywords::operations_in(&words));

        Self {
            raw: query.to_owned(),
            pattern: canonical_pattern(&normalized),
            normalized,
            numbers,
            operations,
            words,
        }
    }
}
