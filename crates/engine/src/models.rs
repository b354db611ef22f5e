//! Core domain models for compiled workflows.
//!
//! A [`CompiledWorkflow`] is the executable graph produced from one
//! expression. A [`Workflow`] wraps it with the library metadata the
//! matcher searches over. Both serialise to JSON so callers can store them.

use chrono::{DateTime, Utc};
use nodes::OperationKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Value bound to an operand node: a literal or a named input, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OperandValue {
    Literal(f64),
    Variable(String),
}

/// What a node does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// An input to the computation.
    Operand { value: OperandValue },
    /// Applies `operation` to the values arriving on its incoming edges.
    Operator { operation: OperationKind },
    /// Final output. Carries no value; results are returned per execution.
    Result,
}

/// A single node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Unique identifier within this graph (referenced by edges).
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl WorkflowNode {
    pub fn literal(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Operand {
                value: OperandValue::Literal(value),
            },
        }
    }

    pub fn variable(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Operand {
                value: OperandValue::Variable(name.into()),
            },
        }
    }

    pub fn operator(id: impl Into<String>, operation: OperationKind) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Operator { operation },
        }
    }

    pub fn result(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Result,
        }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// Directed edge: the value of `source` flows into `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl WorkflowEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CompiledWorkflow
// ---------------------------------------------------------------------------

/// An executable expression graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledWorkflow {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    /// Operations in the order the compiler emitted them.
    pub operations: Vec<OperationKind>,
    pub variable_names: Vec<String>,
    /// Whitespace-free source expression the graph was compiled from.
    pub source_pattern: String,
}

impl CompiledWorkflow {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Literal operand values in node order.
    pub fn literal_values(&self) -> Vec<f64> {
        self.nodes
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::Operand {
                    value: OperandValue::Literal(v),
                } => Some(*v),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// A compiled workflow plus the metadata used to find it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sample phrasings that should retrieve this workflow.
    #[serde(default)]
    pub examples: Vec<String>,
    pub graph: CompiledWorkflow,
    pub created_at: DateTime<Utc>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, graph: CompiledWorkflow) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            examples: Vec::new(),
            graph,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}
