//! Expression tokenizer.
//!
//! Recognised lexemes:
//! - numbers: `digits(.digits)?`
//! - operators: exactly one of `+ - * / ^ %`
//! - parentheses: `(` and `)`
//! - variables: an ASCII letter followed by letters, digits or `_`
//!
//! Whitespace separates tokens and is never emitted. Any other character is
//! handled according to [`TokenizeMode`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{SyntaxError, Token, TokenKind};

/// What to do with characters outside the expression alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// Drop unrecognised characters silently.
    #[default]
    Lenient,
    /// Fail with [`SyntaxError::UnexpectedCharacter`].
    Strict,
}

const OPERATORS: &[char] = &['+', '-', '*', '/', '^', '%'];

/// Tokenize `input` in lenient mode.
pub fn tokenize(input: &str) -> Vec<Token> {
    // Lenient tokenization never fails.
    tokenize_with(input, TokenizeMode::Lenient).unwrap_or_default()
}

/// Tokenize `input` using the given mode.
///
/// # Errors
/// [`SyntaxError::UnexpectedCharacter`] in [`TokenizeMode::Strict`] when a
/// character outside the alphabet is found.
pub fn tokenize_with(input: &str, mode: TokenizeMode) -> Result<Vec<Token>, SyntaxError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let position = tokens.len();

        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let start = i;
            i = skip_digits(&chars, i);
            if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                i = skip_digits(&chars, i + 1);
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::new(TokenKind::Number, text, position));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::new(TokenKind::Variable, text, position));
        } else if OPERATORS.contains(&c) {
            tokens.push(Token::new(TokenKind::Operator, c.to_string(), position));
            i += 1;
        } else if c == '(' || c == ')' {
            tokens.push(Token::new(TokenKind::Parenthesis, c.to_string(), position));
            i += 1;
        } else {
            match mode {
                TokenizeMode::Strict => {
                    return Err(SyntaxError::UnexpectedCharacter { ch: c, offset: i });
                }
                TokenizeMode::Lenient => {
                    trace!(ch = %c, offset = i, "skipping unrecognised character");
                    i += 1;
                }
            }
        }
    }

    Ok(tokens)
}

fn skip_digits(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn splits_numbers_operators_and_parens() {
        let tokens = tokenize("(3+5) - 4*(6.25+9)");
        assert_eq!(
            values(&tokens),
            vec!["(", "3", "+", "5", ")", "-", "4", "*", "(", "6.25", "+", "9", ")"]
        );
        assert_eq!(tokens[9].kind, TokenKind::Number);
    }

    #[test]
    fn positions_are_sequential_indices() {
        let tokens = tokenize("  12   +  x ");
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn variables_may_contain_digits_and_underscores() {
        let tokens = tokenize("rate_2 * principal");
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[0].value, "rate_2");
        assert_eq!(tokens[2].value, "principal");
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        let tokens = tokenize("3.");
        assert_eq!(values(&tokens), vec!["3"]);
    }

    #[test]
    fn lenient_mode_skips_unknown_characters() {
        let tokens = tokenize("4 & 7");
        assert_eq!(values(&tokens), vec!["4", "7"]);
    }

    #[test]
    fn strict_mode_rejects_unknown_characters() {
        let err = tokenize_with("4 & 7", TokenizeMode::Strict).unwrap_err();
        assert_eq!(err, SyntaxError::UnexpectedCharacter { ch: '&', offset: 2 });
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("   ").is_empty());
    }
}
