//! `matcher` crate: ranks a library of compiled workflows against a query,
//! which may be a formula (`40 + 70`) or a sentence ("add forty and seventy").

pub mod candidate;
pub mod keywords;
pub mod matcher;
pub mod query;
pub mod scorers;
pub mod similarity;

pub use candidate::{compare_candidates, MatchCandidate, MatchKind};
pub use matcher::{find_matches, MatcherConfig, WorkflowMatcher};
pub use query::QueryFeatures;
pub use scorers::Scorer;
