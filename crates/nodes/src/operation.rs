//! The closed set of arithmetic operations an operator node can carry.
//!
//! Operand handling rules:
//! - `Addition` / `Multiplication` are associative and accept any number of
//!   operands (identity element when empty).
//! - `Subtraction` / `Division` fold left-to-right, first operand as seed.
//! - `Exponentiation` / `Modulo` are strictly binary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NodeError;

/// One of the six supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Exponentiation,
    Modulo,
}

impl OperationKind {
    /// Every operation, in declaration order.
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Addition,
        OperationKind::Subtraction,
        OperationKind::Multiplication,
        OperationKind::Division,
        OperationKind::Exponentiation,
        OperationKind::Modulo,
    ];

    /// The infix symbol used in expressions.
    pub fn symbol(self) -> char {
        match self {
            OperationKind::Addition => '+',
            OperationKind::Subtraction => '-',
            OperationKind::Multiplication => '*',
            OperationKind::Division => '/',
            OperationKind::Exponentiation => '^',
            OperationKind::Modulo => '%',
        }
    }

    /// Inverse of [`OperationKind::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Whether the operation takes exactly two operands.
    pub fn is_strictly_binary(self) -> bool {
        matches!(self, OperationKind::Exponentiation | OperationKind::Modulo)
    }

    /// Apply the operation to `operands`, taken in edge order.
    ///
    /// # Errors
    /// - [`NodeError::Arity`] for a wrong operand count.
    /// - [`NodeError::DivisionByZero`] / [`NodeError::ModuloByZero`] for a
    ///   zero divisor.
    pub fn apply(self, operands: &[f64]) -> Result<f64, NodeError> {
        match self {
            OperationKind::Addition => Ok(operands.iter().sum()),

            OperationKind::Multiplication => Ok(operands.iter().product()),

            OperationKind::Subtraction => match operands.split_first() {
                None => Err(self.arity("at least 1", 0)),
                Some((first, [])) => Ok(-first),
                Some((first, rest)) => Ok(rest.iter().fold(*first, |acc, v| acc - v)),
            },

            OperationKind::Division => {
                let (first, rest) = operands
                    .split_first()
                    .ok_or_else(|| self.arity("at least 1", 0))?;
                rest.iter().try_fold(*first, |acc, divisor| {
                    if *divisor == 0.0 {
                        Err(NodeError::DivisionByZero)
                    } else {
                        Ok(acc / divisor)
                    }
                })
            }

            OperationKind::Exponentiation => match operands {
                [base, exponent] => Ok(base.powf(*exponent)),
                _ => Err(self.arity("exactly 2", operands.len())),
            },

            OperationKind::Modulo => match operands {
                [_, divisor] if *divisor == 0.0 => Err(NodeError::ModuloByZero),
                [dividend, divisor] => Ok(dividend % divisor),
                _ => Err(self.arity("exactly 2", operands.len())),
            },
        }
    }

    fn arity(self, expected: &'static str, found: usize) -> NodeError {
        NodeError::Arity {
            operation: self,
            expected,
            found,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Addition => "addition",
            OperationKind::Subtraction => "subtraction",
            OperationKind::Multiplication => "multiplication",
            OperationKind::Division => "division",
            OperationKind::Exponentiation => "exponentiation",
            OperationKind::Modulo => "modulo",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for op in OperationKind::ALL {
            assert_eq!(OperationKind::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(OperationKind::from_symbol('&'), None);
    }

    #[test]
    fn addition_and_multiplication_identities() {
        assert_eq!(OperationKind::Addition.apply(&[]), Ok(0.0));
        assert_eq!(OperationKind::Multiplication.apply(&[]), Ok(1.0));
        assert_eq!(OperationKind::Addition.apply(&[1.0, 2.0, 3.5]), Ok(6.5));
        assert_eq!(OperationKind::Multiplication.apply(&[2.0, 3.0, 4.0]), Ok(24.0));
    }

    #[test]
    fn subtraction_folds_left_and_negates_single_operand() {
        assert_eq!(OperationKind::Subtraction.apply(&[10.0, 3.0, 2.0]), Ok(5.0));
        assert_eq!(OperationKind::Subtraction.apply(&[4.0]), Ok(-4.0));
        assert!(matches!(
            OperationKind::Subtraction.apply(&[]),
            Err(NodeError::Arity { found: 0, .. })
        ));
    }

    #[test]
    fn division_folds_left_and_rejects_zero_divisors() {
        assert_eq!(OperationKind::Division.apply(&[100.0, 10.0, 2.0]), Ok(5.0));
        assert_eq!(OperationKind::Division.apply(&[7.0]), Ok(7.0));
        assert_eq!(OperationKind::Division.apply(&[0.0, 5.0]), Ok(0.0));
        assert_eq!(
            OperationKind::Division.apply(&[10.0, 2.0, 0.0]),
            Err(NodeError::DivisionByZero)
        );
    }

    #[test]
    fn exponentiation_is_strictly_binary() {
        assert_eq!(OperationKind::Exponentiation.apply(&[2.0, 10.0]), Ok(1024.0));
        assert!(matches!(
            OperationKind::Exponentiation.apply(&[2.0, 3.0, 2.0]),
            Err(NodeError::Arity { operation: OperationKind::Exponentiation, found: 3, .. })
        ));
        assert!(matches!(
            OperationKind::Exponentiation.apply(&[2.0]),
            Err(NodeError::Arity { found: 1, .. })
        ));
    }

    #[test]
    fn negative_base_with_fractional_exponent_is_nan() {
        let value = OperationKind::Exponentiation.apply(&[-8.0, 0.5]).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn modulo_keeps_sign_of_dividend() {
        assert_eq!(OperationKind::Modulo.apply(&[10.0, 3.0]), Ok(1.0));
        assert_eq!(OperationKind::Modulo.apply(&[-10.0, 3.0]), Ok(-1.0));
        assert_eq!(
            OperationKind::Modulo.apply(&[10.0, 0.0]),
            Err(NodeError::ModuloByZero)
        );
        assert!(OperationKind::Modulo.apply(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&OperationKind::Exponentiation).unwrap();
        assert_eq!(json, "\"exponentiation\"");
    }

    #[test]
    fn arity_error_message_names_the_operation() {
        let err = OperationKind::Modulo.apply(&[1.0]).unwrap_err();
        assert_eq!(err.to_string(), "modulo expects exactly 2 operand(s), got 1");
    }
}
