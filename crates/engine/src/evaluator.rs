//! One-shot expression evaluation.
//!
//! Goes through the same tokenizer → parser → compiler → executor pipeline
//! as persisted workflows; the expression text is never executed as code.

use std::collections::HashMap;

use expr::{ParserConfig, SyntaxError, Token, TokenKind};
use tracing::debug;

use crate::compiler::compile_to_graph;
use crate::executor::WorkflowExecutor;
use crate::EngineError;

/// Evaluates expressions without keeping the compiled graph around.
#[derive(Debug, Clone, Default)]
pub struct QuickEvaluator {
    parser: ParserConfig,
    executor: WorkflowExecutor,
}

impl QuickEvaluator {
    pub fn new(parser: ParserConfig) -> Self {
        Self {
            parser,
            executor: WorkflowExecutor::default(),
        }
    }

    /// Evaluate `expression`, substituting variables from `inputs`.
    ///
    /// # Errors
    /// - [`SyntaxError::Empty`] / [`SyntaxError::UnbalancedParentheses`] from
    ///   the pre-checks, or any other syntax error from parsing.
    /// - Execution errors such as [`EngineError::MissingInput`] or a
    ///   division by zero.
    /// - [`EngineError::NonFiniteResult`] when the value is NaN or infinite.
    pub fn evaluate(&self, expression: &str, inputs: &HashMap<String, f64>) -> Result<f64, EngineError> {
        if expression.trim().is_empty() {
            return Err(SyntaxError::Empty.into());
        }

        let open = expression.chars().filter(|&c| c == '(').count();
        let close = expression.chars().filter(|&c| c == ')').count();
        if open != close {
            return Err(SyntaxError::UnbalancedParentheses { open, close }.into());
        }

        let tokens = substitute(expr::tokenize_with(expression, self.parser.mode)?, inputs);
        let ast = expr::parse_tokens(&tokens)?;
        let graph = compile_to_graph(&ast)?;
        let outcome = self.executor.execute(&graph, &HashMap::new())?;

        debug!(expression, result = outcome.result, "evaluated expression");

        if outcome.result.is_finite() {
            Ok(outcome.result)
        } else {
            Err(EngineError::NonFiniteResult(outcome.result))
        }
    }
}

/// Evaluate `expression` with the default (lenient) parser configuration.
///
/// # Errors
/// See [`QuickEvaluator::evaluate`].
pub fn evaluate(expression: &str, inputs: &HashMap<String, f64>) -> Result<f64, EngineError> {
    QuickEvaluator::default().evaluate(expression, inputs)
}

/// Replace bound variable tokens with number tokens. Matching is per token,
/// so `a` never touches `ab`.
fn substitute(tokens: Vec<Token>, inputs: &HashMap<String, f64>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token.kind {
            TokenKind::Variable => match inputs.get(&token.value) {
                Some(value) => Token::new(TokenKind::Number, value.to_string(), token.position),
                None => token,
            },
            _ => token,
        })
        .collect()
}
