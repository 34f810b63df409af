//! Static validation run once by `StateGraph::compile`.
//!
//! Checks, in order: edge declarations are well formed, START has an outgoing edge, every
//! referenced id is registered, END is reachable from START. Nodes unreachable from START and
//! shadowed conditional edges come back as warnings.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::edge::{ConditionalEdge, EdgeTable};
use super::{CompilationError, CompileWarning, NodeRegistry, END, START};

/// Builds the frozen edge table from declarations, rejecting duplicates and edges that leave
/// END or enter START.
pub(super) fn build_edge_table(
    direct: Vec<(String, String)>,
    branches: Vec<(String, ConditionalEdge)>,
) -> Result<EdgeTable, CompilationError> {
    let mut direct_map = HashMap::new();
    for (from, to) in direct {
        if from == END || to == START {
            return Err(CompilationError::InvalidEdge(format!("{} -> {}", from, to)));
        }
        if direct_map.contains_key(&from) {
            return Err(CompilationError::DuplicateEdge {
                from,
                kind: "unconditional",
            });
        }
        direct_map.insert(from, to);
    }

    let mut branch_map = HashMap::new();
    for (from, edge) in branches {
        if from == END {
            return Err(CompilationError::InvalidEdge(format!("{} -> <router>", from)));
        }
        if edge.labels().next().is_none() {
            return Err(CompilationError::EmptyPathMap(from));
        }
        if let Some(to) = edge.targets().find(|t| t.as_str() == START) {
            return Err(CompilationError::InvalidEdge(format!("{} -> {}", from, to)));
        }
        if branch_map.contains_key(&from) {
            return Err(CompilationError::DuplicateEdge {
                from,
                kind: "conditional",
            });
        }
        branch_map.insert(from, edge);
    }

    Ok(EdgeTable::new(direct_map, branch_map))
}

/// Validates the graph structure; returns the non-fatal warnings on success.
pub(super) fn validate(
    nodes: &NodeRegistry,
    edges: &EdgeTable,
) -> Result<Vec<CompileWarning>, CompilationError> {
    if !edges.has_outgoing(START) {
        return Err(CompilationError::MissingStart);
    }

    check_references(nodes, edges)?;

    let reachable = reachable_from_start(nodes, edges);
    if !reachable.contains(END) {
        return Err(CompilationError::EndUnreachable);
    }

    let mut warnings = Vec::new();
    let unreachable: BTreeSet<&String> = nodes
        .ids()
        .filter(|id| !reachable.contains(id.as_str()))
        .collect();
    warnings.extend(
        unreachable
            .into_iter()
            .map(|id| CompileWarning::UnreachableNode(id.clone())),
    );
    let mut shadowed: Vec<&String> = nodes
        .ids()
        .filter(|id| edges.direct(id).is_some() && edges.conditional(id).is_some())
        .collect();
    shadowed.sort();
    warnings.extend(
        shadowed
            .into_iter()
            .map(|id| CompileWarning::ShadowedConditionalEdge(id.clone())),
    );
    Ok(warnings)
}

fn check_references(nodes: &NodeRegistry, edges: &EdgeTable) -> Result<(), CompilationError> {
    let mut pairs: Vec<(&String, &String)> = edges.pairs().collect();
    pairs.sort();
    for (from, to) in pairs {
        let edge = format!("{} -> {}", from, to);
        if from != START && !nodes.contains(from) {
            return Err(CompilationError::NodeNotFound {
                node: from.clone(),
                edge,
            });
        }
        if to != END && !nodes.contains(to) {
            return Err(CompilationError::NodeNotFound {
                node: to.clone(),
                edge,
            });
        }
    }

    let mut ids: Vec<&String> = nodes.ids().collect();
    ids.sort();
    for id in ids {
        for dest in nodes.destinations(id) {
            if dest != END && !nodes.contains(dest) {
                return Err(CompilationError::NodeNotFound {
                    node: dest.clone(),
                    edge: format!("{} -> (goto) {}", id, dest),
                });
            }
        }
    }
    Ok(())
}

/// Forward traversal from START over edges, conditional fan-out and declared destinations.
fn reachable_from_start<'a>(nodes: &'a NodeRegistry, edges: &'a EdgeTable) -> HashSet<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    seen.insert(START);
    queue.push_back(START);
    while let Some(current) = queue.pop_front() {
        let declared = nodes.destinations(current).iter().map(String::as_str);
        for next in edges.successors(current).into_iter().chain(declared) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}
