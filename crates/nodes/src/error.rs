//! Node-level error type.

use thiserror::Error;

use crate::OperationKind;

/// Errors returned when an operator node is applied to its operands.
///
/// The engine wraps these with the id of the failing node; they never abort
/// the process and are always handed back to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeError {
    /// The operator received an operand count it cannot work with.
    #[error("{operation} expects {expected} operand(s), got {found}")]
    Arity {
        operation: OperationKind,
        expected: &'static str,
        found: usize,
    },

    /// A divisor after the first operand of a division was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The right-hand operand of a modulo was zero.
    #[error("modulo by zero")]
    ModuloByZero,
}
