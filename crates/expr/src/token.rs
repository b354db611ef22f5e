//! Lexical tokens.

use serde::{Deserialize, Serialize};

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Number,
    Operator,
    Variable,
    Parenthesis,
}

/// A single token, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token.
    pub value: String,
    /// Sequential index among the produced tokens (not a byte offset).
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    /// True for a parenthesis token holding `paren`.
    pub fn is_paren(&self, paren: char) -> bool {
        self.kind == TokenKind::Parenthesis && self.value.starts_with(paren)
    }

    /// True for an operator token holding `symbol`.
    pub fn is_operator(&self, symbol: char) -> bool {
        self.kind == TokenKind::Operator && self.value.starts_with(symbol)
    }
}
