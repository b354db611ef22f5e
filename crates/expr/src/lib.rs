//! `expr` crate: tokenizer, AST and parser for arithmetic expressions.
//!
//! ```
//! let parsed = expr::parse("2 + 3 * x").unwrap();
//! assert_eq!(parsed.ast.to_string(), "2+3*x");
//! assert_eq!(parsed.variables, vec!["x".to_string()]);
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod token;
pub mod tokenizer;

use nodes::OperationKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use ast::{Expression, Operand};
pub use error::SyntaxError;
pub use parser::{parse_tokens, MAX_DEPTH};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, tokenize_with, TokenizeMode};

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub mode: TokenizeMode,
}

impl ParserConfig {
    pub fn strict() -> Self {
        Self {
            mode: TokenizeMode::Strict,
        }
    }
}

/// Everything derived from parsing one expression string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedExpression {
    pub tokens: Vec<Token>,
    pub ast: Expression,
    /// Distinct variable names, first appearance first.
    pub variables: Vec<String>,
    /// Operations in evaluation (post-) order.
    pub operations: Vec<OperationKind>,
    pub complexity_score: u32,
}

/// Parse `expression` with the default (lenient) configuration.
///
/// # Errors
/// [`SyntaxError`] for malformed input.
pub fn parse(expression: &str) -> Result<ParsedExpression, SyntaxError> {
    parse_with(expression, ParserConfig::default())
}

/// Parse `expression` with an explicit configuration.
///
/// # Errors
/// [`SyntaxError`] for malformed input, including unrecognised characters
/// in strict mode.
pub fn parse_with(expression: &str, config: ParserConfig) -> Result<ParsedExpression, SyntaxError> {
    let tokens = tokenize_with(expression, config.mode)?;
    let ast = parse_tokens(&tokens)?;
    let variables = ast.variables();
    let operations = ast.operations();
    let complexity_score = complexity(&operations, variables.len(), ast.group_depth());

    debug!(
        tokens = tokens.len(),
        operations = operations.len(),
        complexity_score,
        "parsed expression"
    );

    Ok(ParsedExpression {
        tokens,
        ast,
        variables,
        operations,
        complexity_score,
    })
}

/// Lowercase `text` and strip all whitespace.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn complexity(operations: &[OperationKind], variable_count: usize, group_depth: usize) -> u32 {
    let operator_weight: usize = operations
        .iter()
        .map(|op| match op {
            OperationKind::Addition | OperationKind::Subtraction => 1,
            OperationKind::Multiplication | OperationKind::Division | OperationKind::Modulo => 2,
            OperationKind::Exponentiation => 3,
        })
        .sum();
    u32::try_from(operator_weight + variable_count + group_depth).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_summarises_expression() {
        let parsed = parse("(a + b) * a ^ 2").unwrap();
        assert_eq!(parsed.tokens.len(), 9);
        assert_eq!(parsed.variables, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            parsed.operations,
            vec![
                OperationKind::Addition,
                OperationKind::Exponentiation,
                OperationKind::Multiplication,
            ]
        );
        // 1 + 3 + 2 for the operators, 2 variables, 1 level of parentheses.
        assert_eq!(parsed.complexity_score, 9);
    }

    #[test]
    fn strict_config_surfaces_stray_characters() {
        assert!(parse("4 & 7").is_err());
        assert!(matches!(
            parse_with("4 + 7 $", ParserConfig::strict()),
            Err(SyntaxError::UnexpectedCharacter { ch: '$', .. })
        ));
        assert!(parse("4 + 7 $").is_ok());
    }

    #[test]
    fn normalize_strips_whitespace_and_case() {
        assert_eq!(normalize("  Rate * 4 + X "), "rate*4+x");
    }

    #[test]
    fn parsed_expression_serializes() {
        let parsed = parse("1 + x").unwrap();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["variables"][0], "x");
        assert_eq!(json["operations"][0], "addition");
        assert_eq!(json["tokens"][1]["kind"], "operator");
        assert_eq!(json["ast"]["type"], "operator");
    }
}
