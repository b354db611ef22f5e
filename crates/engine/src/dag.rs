//! DAG validation. Run this before executing a compiled workflow.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the graph.
//! 2. Every edge must reference valid node IDs (both `source` and `target`).
//! 3. At most one Result node.
//! 4. The directed graph must be acyclic.
//!
//! Returns a topologically-sorted list of node IDs on success: every node
//! appears after all nodes feeding its incoming edges.

use std::collections::{HashMap, HashSet};

use crate::models::{CompiledWorkflow, NodeKind};
use crate::EngineError;

#[derive(Clone, Copy)]
enum Mark {
    InProgress,
    Done,
}

/// Validate the graph and return node IDs in dependency order.
///
/// The order is deterministic: roots are visited in node-list order and
/// each node's dependencies in edge-list order.
///
/// # Errors
/// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
/// - [`EngineError::UnknownNodeReference`] if an edge references a missing node.
/// - [`EngineError::MultipleResultNodes`] if more than one Result node exists.
/// - [`EngineError::CircularDependency`] if the graph is not acyclic.
pub fn validate_dag(graph: &CompiledWorkflow) -> Result<Vec<String>, EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs are unique
    // -----------------------------------------------------------------------
    let mut seen_ids: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if !seen_ids.insert(node.id.as_str()) {
            return Err(EngineError::DuplicateNodeId(node.id.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Validate edge endpoints
    // -----------------------------------------------------------------------
    for edge in &graph.edges {
        if !seen_ids.contains(edge.source.as_str()) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.source.clone(),
                side: "source",
            });
        }
        if !seen_ids.contains(edge.target.as_str()) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.target.clone(),
                side: "target",
            });
        }
    }

    // -----------------------------------------------------------------------
    // 3. Single result
    // -----------------------------------------------------------------------
    let results = graph
        .nodes
        .iter()
        .filter(|n| matches!(n.kind, NodeKind::Result))
        .count();
    if results > 1 {
        return Err(EngineError::MultipleResultNodes(results));
    }

    // -----------------------------------------------------------------------
    // 4. Depth-first topological sort
    // -----------------------------------------------------------------------
    let incoming = incoming_sources(graph);
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(graph.nodes.len());
    let mut sorted: Vec<String> = Vec::with_capacity(graph.nodes.len());

    for root in &graph.nodes {
        if marks.contains_key(root.id.as_str()) {
            continue;
        }
        marks.insert(root.id.as_str(), Mark::InProgress);
        let mut stack: Vec<(&str, usize)> = vec![(root.id.as_str(), 0)];

        while let Some(top) = stack.last_mut() {
            let node_id = top.0;
            let deps = incoming.get(node_id).map(Vec::as_slice).unwrap_or(&[]);

            if let Some(&dep) = deps.get(top.1) {
                top.1 += 1;
                match marks.get(dep) {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress) => {
                        return Err(EngineError::CircularDependency {
                            node_id: dep.to_owned(),
                        });
                    }
                    None => {
                        marks.insert(dep, Mark::InProgress);
                        stack.push((dep, 0));
                    }
                }
            } else {
                marks.insert(node_id, Mark::Done);
                sorted.push(node_id.to_owned());
                stack.pop();
            }
        }
    }

    Ok(sorted)
}

/// Map each node id to the sources of its incoming edges, in edge order.
pub(crate) fn incoming_sources(graph: &CompiledWorkflow) -> HashMap<&str, Vec<&str>> {
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        incoming
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }
    incoming
}
