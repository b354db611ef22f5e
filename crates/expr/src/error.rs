//! Syntax errors produced by the tokenizer and the parser.

use thiserror::Error;

/// Malformed expression input.
///
/// Each failure condition is its own variant so callers can report it
/// precisely instead of relying on a generic message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    /// Input was empty or contained only whitespace / skipped characters.
    #[error("expression is empty")]
    Empty,

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token '{value}' at position {position}")]
    UnexpectedToken { value: String, position: usize },

    /// Input ended while an operand was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A `)` with no matching `(`.
    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseParen { position: usize },

    /// A `(` that was never closed.
    #[error("unclosed '(' at position {position}")]
    UnclosedParen { position: usize },

    /// A complete expression was followed by more tokens.
    #[error("unexpected trailing token '{value}' at position {position}")]
    TrailingTokens { value: String, position: usize },

    /// A number token that does not fit an `f64`.
    #[error("invalid number '{value}' at position {position}")]
    InvalidNumber { value: String, position: usize },

    /// Strict tokenization met a character outside the expression alphabet.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    /// Opening and closing parenthesis counts differ.
    #[error("unbalanced parentheses: {open} '(' vs {close} ')'")]
    UnbalancedParentheses { open: usize, close: usize },

    /// Nesting or operator chaining beyond the parser's depth limit.
    #[error("expression nests too deeply at position {position}")]
    TooDeep { position: usize },
}
