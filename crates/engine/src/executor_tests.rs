//! Tests for the workflow execution engine.
//!
//! Most graphs here come from the compiler; the structural failure cases
//! (cycles, n-ary operators, missing result nodes) are built by hand the way
//! a visual editor could produce them.

use std::collections::HashMap;

use nodes::{NodeError, OperationKind};
use proptest::prelude::*;

use crate::models::{CompiledWorkflow, WorkflowEdge, WorkflowNode};
use crate::{compile, compile_to_graph, evaluate, execute, EngineError, ExecutorConfig, WorkflowExecutor};

fn no_inputs() -> HashMap<String, f64> {
    HashMap::new()
}

fn inputs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Build a graph from nodes and `(source, target)` pairs, edge ids in order.
fn graph(nodes: Vec<WorkflowNode>, edges: &[(&str, &str)]) -> CompiledWorkflow {
    CompiledWorkflow {
        nodes,
        edges: edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| WorkflowEdge::new(format!("e{i}"), *s, *t))
            .collect(),
        operations: vec![],
        variable_names: vec![],
        source_pattern: String::new(),
    }
}

// ============================================================
// Compiled graphs
// ============================================================

#[test]
fn compiled_expression_executes_with_precedence() {
    let wf = compile("2 + 3 * 4").unwrap();
    let outcome = execute(&wf, &no_inputs()).unwrap();
    assert_eq!(outcome.result, 14.0);
    assert!(!outcome.degraded);

    let wf = compile("2 ^ 3 ^ 2").unwrap();
    assert_eq!(execute(&wf, &no_inputs()).unwrap().result, 512.0);
}

#[test]
fn steps_follow_evaluation_order() {
    let wf = compile("(a + b) * c").unwrap();
    let outcome = execute(&wf, &inputs(&[("a", 1.0), ("b", 2.0), ("c", 4.0)])).unwrap();

    assert_eq!(outcome.result, 12.0);
    assert_eq!(outcome.steps.len(), 2);
    assert_eq!(outcome.steps[0].operation, OperationKind::Addition);
    assert_eq!(outcome.steps[0].operands_used, vec![1.0, 2.0]);
    assert_eq!(outcome.steps[0].result, 3.0);
    assert_eq!(outcome.steps[1].operation, OperationKind::Multiplication);
    assert_eq!(outcome.steps[1].operands_used, vec![3.0, 4.0]);
}

#[test]
fn same_graph_runs_with_different_inputs() {
    let wf = compile("principal * rate / 100").unwrap();
    let first = execute(&wf, &inputs(&[("principal", 1000.0), ("rate", 5.0)])).unwrap();
    let second = execute(&wf, &inputs(&[("principal", 2000.0), ("rate", 2.5)])).unwrap();
    assert_eq!(first.result, 50.0);
    assert_eq!(second.result, 50.0);
    assert_ne!(first.execution_id, second.execution_id);
}

#[test]
fn execution_is_deterministic() {
    let wf = compile("(x - 3) / (y + 1) % 7 ^ 2").unwrap();
    let vars = inputs(&[("x", 42.0), ("y", 2.0)]);

    let a = execute(&wf, &vars).unwrap();
    let b = execute(&wf, &vars).unwrap();
    assert_eq!(a.result, b.result);
    assert_eq!(a.steps, b.steps);
}

#[test]
fn missing_variable_fails_before_any_step() {
    let wf = compile("a + b").unwrap();
    let err = execute(&wf, &inputs(&[("a", 1.0)])).unwrap_err();
    assert_eq!(err, EngineError::MissingInput("b".into()));
}

#[test]
fn division_by_zero_names_the_failing_node() {
    let wf = compile("1 + 10 / 0").unwrap();
    match execute(&wf, &no_inputs()) {
        Err(EngineError::Operation { node_id, source }) => {
            assert_eq!(source, NodeError::DivisionByZero);
            assert!(matches!(
                wf.node(&node_id).map(|n| &n.kind),
                Some(crate::NodeKind::Operator { operation: OperationKind::Division })
            ));
        }
        other => panic!("expected division failure, got {other:?}"),
    }
}

#[test]
fn bare_operand_expression_returns_its_value() {
    let wf = compile("x").unwrap();
    let outcome = execute(&wf, &inputs(&[("x", 7.5)])).unwrap();
    assert_eq!(outcome.result, 7.5);
    assert!(outcome.steps.is_empty());
}

#[test]
fn nan_from_power_is_returned_by_execute() {
    let wf = compile("(0 - 8) ^ 0.5").unwrap();
    assert!(execute(&wf, &no_inputs()).unwrap().result.is_nan());
}

// ============================================================
// Hand-built graphs
// ============================================================

#[test]
fn cycle_is_rejected_not_looped() {
    let wf = graph(
        vec![
            WorkflowNode::literal("one", 1.0),
            WorkflowNode::operator("add", OperationKind::Addition),
            WorkflowNode::operator("mul", OperationKind::Multiplication),
            WorkflowNode::result("out"),
        ],
        &[("one", "add"), ("mul", "add"), ("add", "mul"), ("mul", "out")],
    );
    assert!(matches!(
        execute(&wf, &no_inputs()),
        Err(EngineError::CircularDependency { .. })
    ));
}

#[test]
fn associative_operators_accept_many_inputs() {
    let wf = graph(
        vec![
            WorkflowNode::literal("a", 2.0),
            WorkflowNode::literal("b", 3.0),
            WorkflowNode::literal("c", 4.0),
            WorkflowNode::operator("sum", OperationKind::Addition),
            WorkflowNode::operator("product", OperationKind::Multiplication),
            WorkflowNode::result("out"),
        ],
        &[
            ("a", "sum"),
            ("b", "sum"),
            ("c", "sum"),
            ("sum", "product"),
            ("a", "product"),
            ("b", "product"),
            ("product", "out"),
        ],
    );
    let outcome = execute(&wf, &no_inputs()).unwrap();
    assert_eq!(outcome.steps[0].operands_used, vec![2.0, 3.0, 4.0]);
    assert_eq!(outcome.result, 54.0);
}

#[test]
fn subtraction_and_division_fold_in_edge_order() {
    let wf = graph(
        vec![
            WorkflowNode::literal("hundred", 100.0),
            WorkflowNode::literal("ten", 10.0),
            WorkflowNode::literal("two", 2.0),
            WorkflowNode::operator("div", OperationKind::Division),
            WorkflowNode::operator("sub", OperationKind::Subtraction),
            WorkflowNode::result("out"),
        ],
        &[
            ("hundred", "div"),
            ("ten", "div"),
            ("two", "div"),
            ("hundred", "sub"),
            ("div", "sub"),
            ("ten", "sub"),
            ("sub", "out"),
        ],
    );
    let outcome = execute(&wf, &no_inputs()).unwrap();
    // 100 / 10 / 2 = 5, then 100 - 5 - 10 = 85
    assert_eq!(outcome.steps[0].result, 5.0);
    assert_eq!(outcome.result, 85.0);
}

#[test]
fn exponentiation_with_three_inputs_is_an_arity_error() {
    let wf = graph(
        vec![
            WorkflowNode::literal("a", 2.0),
            WorkflowNode::literal("b", 3.0),
            WorkflowNode::literal("c", 2.0),
            WorkflowNode::operator("pow", OperationKind::Exponentiation),
            WorkflowNode::result("out"),
        ],
        &[("a", "pow"), ("b", "pow"), ("c", "pow"), ("pow", "out")],
    );
    let err = execute(&wf, &no_inputs()).unwrap_err();
    assert!(matches!(
        err.node_error(),
        Some(NodeError::Arity { operation: OperationKind::Exponentiation, found: 3, .. })
    ));
}

#[test]
fn missing_result_node_falls_back_and_flags_degraded() {
    let wf = graph(
        vec![
            WorkflowNode::literal("a", 6.0),
            WorkflowNode::literal("b", 7.0),
            WorkflowNode::operator("mul", OperationKind::Multiplication),
        ],
        &[("a", "mul"), ("b", "mul")],
    );
    let outcome = execute(&wf, &no_inputs()).unwrap();
    assert_eq!(outcome.result, 42.0);
    assert!(outcome.degraded);

    let strict = WorkflowExecutor::new(ExecutorConfig {
        allow_degraded: false,
    });
    assert_eq!(
        strict.execute(&wf, &no_inputs()).unwrap_err(),
        EngineError::MissingResultNode
    );
}

#[test]
fn graph_with_only_operands_and_no_result_fails() {
    let wf = graph(vec![WorkflowNode::literal("a", 1.0)], &[]);
    assert_eq!(
        execute(&wf, &no_inputs()).unwrap_err(),
        EngineError::MissingResultNode
    );
}

#[test]
fn result_node_without_input_is_malformed() {
    let wf = graph(
        vec![WorkflowNode::literal("a", 1.0), WorkflowNode::result("out")],
        &[],
    );
    assert_eq!(
        execute(&wf, &no_inputs()).unwrap_err(),
        EngineError::MalformedResult {
            node_id: "out".into(),
            inputs: 0
        }
    );
}

#[test]
fn dangling_edge_is_rejected() {
    let wf = graph(
        vec![WorkflowNode::literal("a", 1.0), WorkflowNode::result("out")],
        &[("a", "out"), ("ghost", "out")],
    );
    assert!(matches!(
        execute(&wf, &no_inputs()),
        Err(EngineError::UnknownNodeReference { side: "source", .. })
    ));
}

#[test]
fn graph_round_trips_through_json() {
    let wf = compile("(a + 2) * 3").unwrap();
    let json = serde_json::to_string(&wf).unwrap();
    let back: CompiledWorkflow = serde_json::from_str(&json).unwrap();
    assert_eq!(back, wf);
    assert_eq!(execute(&back, &inputs(&[("a", 1.0)])).unwrap().result, 9.0);
}

// ============================================================
// Quick evaluator vs. compiled graph
// ============================================================

fn arb_literal_expression() -> impl Strategy<Value = String> {
    let leaf = (0u32..50).prop_map(|n| n.to_string());
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!['+', '-', '*', '/', '%', '^']),
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.prop_map(|e| format!("-{e}")),
        ]
    })
}

proptest! {
    #[test]
    fn evaluate_matches_compiled_execution(expression in arb_literal_expression()) {
        let parsed = expr::parse(&expression).unwrap();
        let graph = compile_to_graph(&parsed.ast).unwrap();
        let executed = execute(&graph, &HashMap::new()).map(|o| o.result);
        let evaluated = evaluate(&expression, &HashMap::new());

        match executed {
            Ok(value) if value.is_finite() => {
                prop_assert_eq!(evaluated.map(f64::to_bits), Ok(value.to_bits()));
            }
            Ok(value) => {
                prop_assert!(matches!(
                    evaluated,
                    Err(EngineError::NonFiniteResult(v)) if v.to_bits() == value.to_bits()
                ));
            }
            Err(err) => prop_assert_eq!(evaluated, Err(err)),
        }
    }
}
