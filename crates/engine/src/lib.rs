//! `engine` crate: workflow graph models, the AST → graph compiler, DAG
//! validation, the executor and the quick evaluator.

pub mod compiler;
pub mod dag;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod models;

pub use compiler::{compile, compile_to_graph, compile_with};
pub use dag::validate_dag;
pub use error::{CompileError, EngineError};
pub use evaluator::{evaluate, QuickEvaluator};
pub use executor::{execute, ExecutionOutcome, ExecutionStep, ExecutorConfig, WorkflowExecutor};
pub use models::{CompiledWorkflow, NodeKind, OperandValue, Workflow, WorkflowEdge, WorkflowNode};

#[cfg(test)]
mod executor_tests;
