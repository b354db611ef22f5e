//! AST → graph compilation.
//!
//! Children are compiled before their parent, so node ids increase in
//! evaluation order. Groups are unwrapped and leave no trace in the graph.

use expr::{Expression, Operand, ParserConfig};
use nodes::OperationKind;
use tracing::debug;

use crate::models::{CompiledWorkflow, WorkflowEdge, WorkflowNode};
use crate::{CompileError, EngineError};

/// Compile an AST into an executable graph.
///
/// # Errors
/// [`CompileError`] for non-finite literals, empty variable names or a tree
/// deeper than the parser would ever build.
pub fn compile_to_graph(ast: &Expression) -> Result<CompiledWorkflow, CompileError> {
    let height = ast.height();
    if height > expr::MAX_DEPTH {
        return Err(CompileError::TooDeep(height));
    }

    let mut compiler = GraphCompiler::default();
    let root = compiler.emit(ast)?;

    let result_id = compiler.next_node_id();
    compiler.nodes.push(WorkflowNode::result(result_id.clone()));
    compiler.connect(root, result_id);

    debug!(
        nodes = compiler.nodes.len(),
        edges = compiler.edges.len(),
        "compiled expression graph"
    );

    Ok(CompiledWorkflow {
        nodes: compiler.nodes,
        edges: compiler.edges,
        operations: compiler.operations,
        variable_names: compiler.variables,
        source_pattern: expr::normalize(&ast.to_string()),
    })
}

/// Parse and compile `expression`, keeping its whitespace-free text as the
/// source pattern.
///
/// # Errors
/// [`EngineError::Syntax`] or [`EngineError::Compile`].
pub fn compile(expression: &str) -> Result<CompiledWorkflow, EngineError> {
    compile_with(expression, ParserConfig::default())
}

/// [`compile`] with an explicit parser configuration.
///
/// # Errors
/// [`EngineError::Syntax`] or [`EngineError::Compile`].
pub fn compile_with(expression: &str, config: ParserConfig) -> Result<CompiledWorkflow, EngineError> {
    let parsed = expr::parse_with(expression, config)?;
    let mut graph = compile_to_graph(&parsed.ast)?;
    graph.source_pattern = expr::normalize(expression);
    Ok(graph)
}

#[derive(Default)]
struct GraphCompiler {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    operations: Vec<OperationKind>,
    variables: Vec<String>,
    node_counter: usize,
    edge_counter: usize,
}

impl GraphCompiler {
    /// Emit nodes for `expr` and return the id of the node holding its value.
    fn emit(&mut self, expr: &Expression) -> Result<String, CompileError> {
        match expr {
            Expression::Group { inner } => self.emit(inner),

            Expression::Operand { operand } => {
                let id = self.next_node_id();
                let node = match operand {
                    Operand::Number(value) if !value.is_finite() => {
                        return Err(CompileError::NonFiniteLiteral(*value));
                    }
                    Operand::Number(value) => WorkflowNode::literal(id.clone(), *value),
                    Operand::Variable(name) if name.trim().is_empty() => {
                        return Err(CompileError::InvalidVariableName(name.clone()));
                    }
                    Operand::Variable(name) => {
                        if !self.variables.contains(name) {
                            self.variables.push(name.clone());
                        }
                        WorkflowNode::variable(id.clone(), name.clone())
                    }
                };
                self.nodes.push(node);
                Ok(id)
            }

            Expression::Operator { op, left, right } => {
                let left_id = self.emit(left)?;
                let right_id = self.emit(right)?;

                let id = self.next_node_id();
                self.nodes.push(WorkflowNode::operator(id.clone(), *op));
                self.operations.push(*op);
                self.connect(left_id, id.clone());
                self.connect(right_id, id.clone());
                Ok(id)
            }
        }
    }

    fn connect(&mut self, source: String, target: String) {
        let id = format!("e{}", self.edge_counter);
        self.edge_counter += 1;
        self.edges.push(WorkflowEdge::new(id, source, target));
    }

    fn next_node_id(&mut self) -> String {
        let id = format!("n{}", self.node_counter);
        self.node_counter += 1;
        id
    }
}
