//! `nodes` crate: operator kinds and the arithmetic each operator node performs.
//!
//! Every operator node in a compiled graph carries an [`OperationKind`]; the
//! engine crate evaluates it through [`OperationKind::apply`].

pub mod error;
pub mod operation;

pub use error::NodeError;
pub use operation::OperationKind;
