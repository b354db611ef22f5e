//! Engine-level error types.

use expr::SyntaxError;
use nodes::NodeError;
use thiserror::Error;

/// AST shapes that cannot be turned into a graph.
///
/// The parser never produces these; they guard hand-built trees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("literal {0} is not a finite number")]
    NonFiniteLiteral(f64),

    #[error("invalid variable name '{0}'")]
    InvalidVariableName(String),

    #[error("expression tree height {0} exceeds the depth limit")]
    TooDeep(usize),
}

/// Errors produced by the workflow engine (compilation, validation, execution).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    // ------ Front-end errors ------
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    // ------ Validation errors ------
    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// An edge references a node ID that doesn't exist in the graph.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference {
        node_id: String,
        side: &'static str,
    },

    /// More than one Result node.
    #[error("graph has {0} result nodes, expected at most one")]
    MultipleResultNodes(usize),

    /// Depth-first traversal reached a node that was still in progress.
    #[error("circular dependency through node '{node_id}'")]
    CircularDependency { node_id: String },

    // ------ Execution errors ------
    /// A variable operand had no value in the inputs.
    #[error("missing input for variable '{0}'")]
    MissingInput(String),

    /// A node that needs a value found none on its incoming edges.
    #[error("node '{node_id}' has no operand values")]
    MissingOperand { node_id: String },

    /// An operator node failed.
    #[error("node '{node_id}' failed: {source}")]
    Operation {
        node_id: String,
        #[source]
        source: NodeError,
    },

    /// The Result node does not have exactly one incoming edge.
    #[error("result node '{node_id}' has {inputs} incoming edges, expected 1")]
    MalformedResult { node_id: String, inputs: usize },

    /// No Result node and no operator to fall back on, or fallback disabled.
    #[error("graph has no result node")]
    MissingResultNode,

    /// The computation finished but produced NaN or an infinity.
    #[error("evaluation error: result {0} is not finite")]
    NonFiniteResult(f64),
}

impl EngineError {
    /// The underlying operator failure, if this is one.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            EngineError::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}
