//! Precedence-climbing recursive descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := power (('*' | '/' | '%') power)*
//! power   := unary ('^' power)?
//! unary   := '-' unary | primary
//! primary := NUMBER | VARIABLE | '(' expr ')'
//! ```
//!
//! `expr` and `term` fold left; `^` recurses into itself so it associates
//! right. Unary minus becomes `0 - operand`.

use nodes::OperationKind;

use crate::{Expression, SyntaxError, Token, TokenKind};

/// Deepest expression tree the parser builds. Covers both parenthesis and
/// unary nesting and long operator chains, since each fold adds a level.
pub const MAX_DEPTH: usize = 256;

/// Parse a token sequence into an AST.
///
/// # Errors
/// Any [`SyntaxError`] describing the first malformation found, including
/// [`SyntaxError::TooDeep`] once the tree would exceed [`MAX_DEPTH`].
pub fn parse_tokens(tokens: &[Token]) -> Result<Expression, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    let Node { expression, .. } = parser.expr()?;

    match parser.peek() {
        None => Ok(expression),
        Some(token) if token.is_paren(')') => Err(SyntaxError::UnmatchedCloseParen {
            position: token.position,
        }),
        Some(token) => Err(SyntaxError::TrailingTokens {
            value: token.value.clone(),
            position: token.position,
        }),
    }
}

/// A parsed subtree and its height.
struct Node {
    expression: Expression,
    height: usize,
}

impl Node {
    fn leaf(expression: Expression) -> Self {
        Self {
            expression,
            height: 1,
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Grammar rules currently re-entered through `(`, unary `-` or `^`.
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Position of the token just consumed.
    fn last_position(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.position)
    }

    /// Consume the next token if it is one of `symbols`.
    fn eat_operator(&mut self, symbols: &[char]) -> Option<OperationKind> {
        let token = self.peek()?;
        if token.kind != TokenKind::Operator {
            return None;
        }
        let symbol = token.value.chars().next()?;
        if !symbols.contains(&symbol) {
            return None;
        }
        self.pos += 1;
        OperationKind::from_symbol(symbol)
    }

    /// Run `rule` one nesting level deeper, refusing past [`MAX_DEPTH`].
    fn nested(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<Node, SyntaxError>,
    ) -> Result<Node, SyntaxError> {
        if self.nesting >= MAX_DEPTH {
            return Err(SyntaxError::TooDeep {
                position: self.last_position(),
            });
        }
        self.nesting += 1;
        let node = rule(self);
        self.nesting -= 1;
        node
    }

    /// Join two subtrees under `op` at the operator token's `position`.
    fn join(op: OperationKind, left: Node, right: Node, position: usize) -> Result<Node, SyntaxError> {
        let height = 1 + left.height.max(right.height);
        if height > MAX_DEPTH {
            return Err(SyntaxError::TooDeep { position });
        }
        Ok(Node {
            expression: Expression::binary(op, left.expression, right.expression),
            height,
        })
    }

    fn expr(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.term()?;
        while let Some(op) = self.eat_operator(&['+', '-']) {
            let position = self.last_position();
            let right = self.term()?;
            left = Self::join(op, left, right, position)?;
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.power()?;
        while let Some(op) = self.eat_operator(&['*', '/', '%']) {
            let position = self.last_position();
            let right = self.power()?;
            left = Self::join(op, left, right, position)?;
        }
        Ok(left)
    }

    fn power(&mut self) -> Result<Node, SyntaxError> {
        let base = self.unary()?;
        if let Some(op) = self.eat_operator(&['^']) {
            let position = self.last_position();
            let exponent = self.nested(Self::power)?;
            return Self::join(op, base, exponent, position);
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Node, SyntaxError> {
        if self.eat_operator(&['-']).is_some() {
            let position = self.last_position();
            let operand = self.nested(Self::unary)?;
            return Self::join(
                OperationKind::Subtraction,
                Node::leaf(Expression::number(0.0)),
                operand,
                position,
            );
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, SyntaxError> {
        let token = self.advance().ok_or(SyntaxError::UnexpectedEnd)?;

        match token.kind {
            TokenKind::Number => token
                .value
                .parse::<f64>()
                .map(|n| Node::leaf(Expression::number(n)))
                .map_err(|_| SyntaxError::InvalidNumber {
                    value: token.value.clone(),
                    position: token.position,
                }),
            TokenKind::Variable => Ok(Node::leaf(Expression::variable(token.value.clone()))),
            TokenKind::Parenthesis if token.is_paren('(') => {
                let inner = self.nested(Self::expr)?;
                match self.advance() {
                    Some(close) if close.is_paren(')') => {
                        if inner.height >= MAX_DEPTH {
                            return Err(SyntaxError::TooDeep {
                                position: token.position,
                            });
                        }
                        Ok(Node {
                            expression: Expression::group(inner.expression),
                            height: inner.height + 1,
                        })
                    }
                    Some(other) => Err(SyntaxError::UnexpectedToken {
                        value: other.value.clone(),
                        position: other.position,
                    }),
                    None => Err(SyntaxError::UnclosedParen {
                        position: token.position,
                    }),
                }
            }
            TokenKind::Parenthesis => Err(SyntaxError::UnmatchedCloseParen {
                position: token.position,
            }),
            TokenKind::Operator => Err(SyntaxError::UnexpectedToken {
                value: token.value.clone(),
                position: token.position,
            }),
        }
    }
}
