//! Workflow execution engine.
//!
//! `WorkflowExecutor` evaluates a [`CompiledWorkflow`]:
//! 1. Binds every operand node (literal value or named input).
//! 2. Validates the DAG and produces a topological ordering.
//! 3. Evaluates operator nodes in that order over the values arriving on
//!    their incoming edges, recording one [`ExecutionStep`] each.
//! 4. Reads the value feeding the Result node.
//!
//! The graph is never mutated; the value of a run lives in the returned
//! [`ExecutionOutcome`], keyed by a fresh execution id.

use std::collections::HashMap;

use nodes::OperationKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::dag::{incoming_sources, validate_dag};
use crate::models::{CompiledWorkflow, NodeKind, OperandValue, WorkflowNode};
use crate::EngineError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Fall back to the last evaluated operator when the graph has no
    /// Result node. The outcome is flagged `degraded`.
    pub allow_degraded: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            allow_degraded: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// Audit record for one evaluated operator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub node_id: String,
    pub operation: OperationKind,
    /// Operand values in edge order.
    pub operands_used: Vec<f64>,
    pub result: f64,
}

/// The result of running a compiled workflow once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub execution_id: Uuid,
    pub result: f64,
    pub steps: Vec<ExecutionStep>,
    /// Set when the result came from the last operator because the graph
    /// had no Result node.
    pub degraded: bool,
}

// ---------------------------------------------------------------------------
// WorkflowExecutor
// ---------------------------------------------------------------------------

/// Stateless executor; one instance can serve any number of graphs and
/// threads.
#[derive(Debug, Clone, Default)]
pub struct WorkflowExecutor {
    config: ExecutorConfig,
}

impl WorkflowExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Execute `graph` with the given variable bindings.
    ///
    /// # Errors
    /// Returns `EngineError` for unbound variables, structural problems
    /// (duplicates, dangling edges, cycles), operator failures, or a missing
    /// or malformed Result node.
    #[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
    pub fn execute(
        &self,
        graph: &CompiledWorkflow,
        inputs: &HashMap<String, f64>,
    ) -> Result<ExecutionOutcome, EngineError> {
        // ------------------------------------------------------------------
        // Bind operands. Any unbound variable aborts before evaluation.
        // ------------------------------------------------------------------
        let mut values: HashMap<&str, f64> = HashMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            if let NodeKind::Operand { value } = &node.kind {
                let bound = match value {
                    OperandValue::Literal(v) => *v,
                    OperandValue::Variable(name) => *inputs
                        .get(name)
                        .ok_or_else(|| EngineError::MissingInput(name.clone()))?,
                };
                values.insert(node.id.as_str(), bound);
            }
        }

        // ------------------------------------------------------------------
        // Validate and topologically sort the DAG.
        // ------------------------------------------------------------------
        let order = validate_dag(graph)?;
        let incoming = incoming_sources(graph);
        let nodes_by_id: HashMap<&str, &WorkflowNode> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        // ------------------------------------------------------------------
        // Evaluate in dependency order.
        // ------------------------------------------------------------------
        let mut steps: Vec<ExecutionStep> = Vec::new();
        let mut result_node: Option<&str> = None;

        for sorted_id in &order {
            let Some(&node) = nodes_by_id.get(sorted_id.as_str()) else {
                continue;
            };
            let node_id = node.id.as_str();
            let sources = incoming.get(node_id).map(Vec::as_slice).unwrap_or(&[]);

            match &node.kind {
                NodeKind::Operator { operation } => {
                    let operands = collect_operands(node_id, sources, &values)?;
                    let value = operation
                        .apply(&operands)
                        .map_err(|source| EngineError::Operation {
                            node_id: node_id.to_owned(),
                            source,
                        })?;

                    debug!(node_id, %operation, ?operands, value, "evaluated operator");
                    values.insert(node_id, value);
                    steps.push(ExecutionStep {
                        node_id: node_id.to_owned(),
                        operation: *operation,
                        operands_used: operands,
                        result: value,
                    });
                }
                NodeKind::Result => {
                    let [source] = sources else {
                        return Err(EngineError::MalformedResult {
                            node_id: node_id.to_owned(),
                            inputs: sources.len(),
                        });
                    };
                    let value = *values.get(source).ok_or_else(|| EngineError::MissingOperand {
                        node_id: node_id.to_owned(),
                    })?;
                    values.insert(node_id, value);
                    result_node = Some(node_id);
                }
                // Operands were bound up front.
                NodeKind::Operand { .. } => {}
            }
        }

        // ------------------------------------------------------------------
        // Extract the final value.
        // ------------------------------------------------------------------
        let (result, degraded) = match result_node.and_then(|id| values.get(id)) {
            Some(value) => (*value, false),
            None => {
                let last = steps
                    .last()
                    .filter(|_| self.config.allow_degraded)
                    .ok_or(EngineError::MissingResultNode)?;
                warn!(
                    node_id = %last.node_id,
                    "graph has no result node, using last evaluated operator"
                );
                (last.result, true)
            }
        };

        Ok(ExecutionOutcome {
            execution_id: Uuid::new_v4(),
            result,
            steps,
            degraded,
        })
    }
}

/// Execute `graph` with the default [`ExecutorConfig`].
///
/// # Errors
/// See [`WorkflowExecutor::execute`].
pub fn execute(
    graph: &CompiledWorkflow,
    inputs: &HashMap<String, f64>,
) -> Result<ExecutionOutcome, EngineError> {
    WorkflowExecutor::default().execute(graph, inputs)
}

fn collect_operands(
    node_id: &str,
    sources: &[&str],
    values: &HashMap<&str, f64>,
) -> Result<Vec<f64>, EngineError> {
    sources
        .iter()
        .map(|source| {
            values
                .get(source)
                .copied()
                .ok_or_else(|| EngineError::MissingOperand {
                    node_id: node_id.to_owned(),
                })
        })
        .collect()
}
