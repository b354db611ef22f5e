//! Abstract syntax tree for arithmetic expressions.

use std::fmt;

use nodes::OperationKind;
use serde::{Deserialize, Serialize};

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Operand {
    Number(f64),
    Variable(String),
}

/// An expression tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Operand { operand: Operand },
    /// Binary operator application.
    Operator {
        op: OperationKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Parenthesised sub-expression.
    Group { inner: Box<Expression> },
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Expression::Operand {
            operand: Operand::Number(value),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Operand {
            operand: Operand::Variable(name.into()),
        }
    }

    pub fn binary(op: OperationKind, left: Expression, right: Expression) -> Self {
        Expression::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn group(inner: Expression) -> Self {
        Expression::Group {
            inner: Box::new(inner),
        }
    }

    /// The expression with any outer `Group` wrappers removed.
    pub fn unwrap_groups(&self) -> &Expression {
        let mut current = self;
        while let Expression::Group { inner } = current {
            current = inner;
        }
        current
    }

    /// Distinct variable names in order of first appearance (left to right).
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.visit(&mut |expr| {
            if let Expression::Operand {
                operand: Operand::Variable(name),
            } = expr
            {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        });
        names
    }

    /// Literal operand values, left to right.
    pub fn literals(&self) -> Vec<f64> {
        let mut values = Vec::new();
        self.visit(&mut |expr| {
            if let Expression::Operand {
                operand: Operand::Number(n),
            } = expr
            {
                values.push(*n);
            }
        });
        values
    }

    /// Operations in post-order, i.e. the order they are evaluated in.
    pub fn operations(&self) -> Vec<OperationKind> {
        let mut ops = Vec::new();
        self.visit(&mut |expr| {
            if let Expression::Operator { op, .. } = expr {
                ops.push(*op);
            }
        });
        ops
    }

    /// Deepest parenthesis nesting level.
    pub fn group_depth(&self) -> usize {
        match self {
            Expression::Operand { .. } => 0,
            Expression::Operator { left, right, .. } => left.group_depth().max(right.group_depth()),
            Expression::Group { inner } => 1 + inner.group_depth(),
        }
    }

    /// Number of levels in the tree; a lone operand has height 1.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Expression, usize)> = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match expr {
                Expression::Operand { .. } => {}
                Expression::Operator { left, right, .. } => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
                Expression::Group { inner } => stack.push((&**inner, depth + 1)),
            }
        }
        deepest
    }

    /// Post-order traversal: children before parents, left before right.
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
        match self {
            Expression::Operand { .. } => {}
            Expression::Operator { left, right, .. } => {
                left.visit(f);
                right.visit(f);
            }
            Expression::Group { inner } => inner.visit(f),
        }
        f(self);
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Variable(name) => f.write_str(name),
        }
    }
}

fn precedence(op: OperationKind) -> u8 {
    match op {
        OperationKind::Addition | OperationKind::Subtraction => 1,
        OperationKind::Multiplication | OperationKind::Division | OperationKind::Modulo => 2,
        OperationKind::Exponentiation => 3,
    }
}

/// Write `child`, parenthesised when `needs_parens` holds for its operator's
/// precedence.
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    child: &Expression,
    needs_parens: impl Fn(u8) -> bool,
) -> fmt::Result {
    match child {
        Expression::Operator { op, .. } if needs_parens(precedence(*op)) => write!(f, "({child})"),
        _ => write!(f, "{child}"),
    }
}

/// Canonical whitespace-free rendering, e.g. `(a+b)*2`. Parses back to an
/// expression with the same value: operator children that would otherwise
/// bind differently, such as desugared unary minus in `2*(0-3)`, are
/// parenthesised.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Operand { operand } => write!(f, "{operand}"),
            Expression::Operator { op, left, right } => {
                let prec = precedence(*op);
                let right_assoc = *op == OperationKind::Exponentiation;
                write_operand(f, left, |p| p < prec || (right_assoc && p == prec))?;
                write!(f, "{}", op.symbol())?;
                write_operand(f, right, |p| p < prec || (!right_assoc && p == prec))
            }
            Expression::Group { inner } => write!(f, "({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expression {
        // (a + 2) * a ^ b
        Expression::binary(
            OperationKind::Multiplication,
            Expression::group(Expression::binary(
                OperationKind::Addition,
                Expression::variable("a"),
                Expression::number(2.0),
            )),
            Expression::binary(
                OperationKind::Exponentiation,
                Expression::variable("a"),
                Expression::variable("b"),
            ),
        )
    }

    #[test]
    fn renders_canonical_form() {
        assert_eq!(sample().to_string(), "(a+2)*a^b");
    }

    #[test]
    fn collects_variables_once_in_order() {
        assert_eq!(sample().variables(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn operations_are_post_order() {
        assert_eq!(
            sample().operations(),
            vec![
                OperationKind::Addition,
                OperationKind::Exponentiation,
                OperationKind::Multiplication,
            ]
        );
    }

    #[test]
    fn group_depth_counts_nesting() {
        let nested = Expression::group(Expression::group(Expression::number(1.0)));
        assert_eq!(nested.group_depth(), 2);
        assert_eq!(sample().group_depth(), 1);
        assert_eq!(nested.unwrap_groups(), &Expression::number(1.0));
    }

    #[test]
    fn literals_left_to_right() {
        let expr = Expression::binary(
            OperationKind::Subtraction,
            Expression::number(4.0),
            Expression::number(7.5),
        );
        assert_eq!(expr.literals(), vec![4.0, 7.5]);
    }

    #[test]
    fn height_counts_levels() {
        assert_eq!(Expression::number(1.0).height(), 1);
        assert_eq!(sample().height(), 4);
    }

    #[test]
    fn rendering_keeps_structure_without_groups() {
        let neg = |e| Expression::binary(OperationKind::Subtraction, Expression::number(0.0), e);

        let product = Expression::binary(OperationKind::Multiplication, Expression::number(2.0), neg(Expression::number(3.0)));
        assert_eq!(product.to_string(), "2*(0-3)");

        let difference = Expression::binary(OperationKind::Subtraction, Expression::number(2.0), neg(Expression::number(3.0)));
        assert_eq!(difference.to_string(), "2-(0-3)");

        let power = Expression::binary(OperationKind::Exponentiation, neg(Expression::number(2.0)), Expression::number(2.0));
        assert_eq!(power.to_string(), "(0-2)^2");

        let nested_power = Expression::binary(
            OperationKind::Exponentiation,
            Expression::binary(OperationKind::Exponentiation, Expression::variable("a"), Expression::variable("b")),
            Expression::variable("c"),
        );
        assert_eq!(nested_power.to_string(), "(a^b)^c");
    }
}
