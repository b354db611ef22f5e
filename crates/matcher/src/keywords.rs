//! Fixed vocabularies used to read intent out of natural-language queries.

use nodes::OperationKind;

/// Words that imply an operation, e.g. "plus" or "divided".
pub const OPERATION_KEYWORDS: &[(OperationKind, &[&str])] = &[
    (
        OperationKind::Addition,
        &["add", "plus", "sum", "total", "increase", "added"],
    ),
    (
        OperationKind::Subtraction,
        &["subtract", "minus", "difference", "less", "decrease", "subtracted"],
    ),
    (
        OperationKind::Multiplication,
        &["multiply", "times", "product", "multiplied", "double", "triple"],
    ),
    (
        OperationKind::Division,
        &["divide", "divided", "quotient", "split", "per", "ratio", "half"],
    ),
    (
        OperationKind::Exponentiation,
        &["power", "squared", "cubed", "exponent", "raised"],
    ),
    (OperationKind::Modulo, &["modulo", "mod", "remainder"]),
];

/// Topic groups: a query and a workflow that both touch a group are related
/// even when they share no literal words.
pub const KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    ("percentage", &["percent", "percentage", "discount", "markup", "off"]),
    (
        "interest",
        &["interest", "compound", "principal", "rate", "loan", "apr", "simple"],
    ),
    ("average", &["average", "mean", "avg", "midpoint"]),
    (
        "finance",
        &["tax", "tip", "price", "cost", "salary", "budget", "profit", "revenue", "invoice"],
    ),
    (
        "basic arithmetic",
        &["add", "plus", "sum", "subtract", "minus", "multiply", "times", "divide", "calculate"],
    ),
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "to", "is", "in", "on", "for", "by", "with", "what", "how",
    "me", "my", "it", "be", "do", "can", "you", "please", "from", "that", "this",
];

/// Operations named by any of `words`.
pub fn operations_in(words: &[String]) -> Vec<OperationKind> {
    OPERATION_KEYWORDS
        .iter()
        .filter(|(_, keywords)| words.iter().any(|w| keywords.contains(&w.as_str())))
        .map(|(op, _)| *op)
        .collect()
}

/// Names of the keyword groups any of `words` belongs to.
pub fn groups_in(words: &[String]) -> Vec<&'static str> {
    KEYWORD_GROUPS
        .iter()
        .filter(|(_, keywords)| words.iter().any(|w| keywords.contains(&w.as_str())))
        .map(|(name, _)| *name)
        .collect()
}

/// Lowercase alphabetic words of `text`, stop words removed, in order.
pub fn content_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}
