//! Edge table: unconditional edges, conditional edges with routers, and the routing rule.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::RunError;
use crate::state::State;

use super::{Next, END};

/// Router: maps the post-update state to a label. Must be deterministic.
pub type RouterFn = Arc<dyn Fn(&State) -> String + Send + Sync>;

/// Conditional edge: router plus a static label-to-node map fixed at declaration time.
#[derive(Clone)]
pub struct ConditionalEdge {
    router: RouterFn,
    path_map: BTreeMap<String, String>,
}

impl ConditionalEdge {
    pub fn new(router: RouterFn, path_map: BTreeMap<String, String>) -> Self {
        Self { router, path_map }
    }

    /// Calls the router and resolves its label; unmapped labels are `UnroutableLabel`.
    pub fn route(&self, from: &str, state: &State) -> Result<String, RunError> {
        let label = (self.router)(state);
        self.path_map
            .get(&label)
            .cloned()
            .ok_or_else(|| RunError::UnroutableLabel {
                node_id: from.to_string(),
                label,
            })
    }

    /// Every node the edge may lead to.
    pub fn targets(&self) -> impl Iterator<Item = &String> {
        self.path_map.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &String> {
        self.path_map.keys()
    }
}

impl fmt::Debug for ConditionalEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("path_map", &self.path_map)
            .finish_non_exhaustive()
    }
}

/// Frozen edges of a compiled graph, keyed by source node (START included).
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    direct: HashMap<String, String>,
    conditional: HashMap<String, ConditionalEdge>,
}

impl EdgeTable {
    pub(crate) fn new(
        direct: HashMap<String, String>,
        conditional: HashMap<String, ConditionalEdge>,
    ) -> Self {
        Self {
            direct,
            conditional,
        }
    }

    pub fn direct(&self, from: &str) -> Option<&str> {
        self.direct.get(from).map(String::as_str)
    }

    pub fn conditional(&self, from: &str) -> Option<&ConditionalEdge> {
        self.conditional.get(from)
    }

    pub fn has_outgoing(&self, from: &str) -> bool {
        self.direct.contains_key(from) || self.conditional.contains_key(from)
    }

    /// All (from, to) pairs, conditional edges fanned out to every label target.
    pub fn pairs(&self) -> impl Iterator<Item = (&String, &String)> {
        self.direct.iter().chain(
            self.conditional
                .iter()
                .flat_map(|(from, edge)| edge.targets().map(move |to| (from, to))),
        )
    }

    /// Statically possible successors of `from`.
    pub fn successors<'a>(&'a self, from: &str) -> Vec<&'a str> {
        let mut out: Vec<&str> = self.direct(from).into_iter().collect();
        if let Some(edge) = self.conditional(from) {
            out.extend(edge.targets().map(String::as_str));
        }
        out
    }

    /// Picks the node to run after `from`, given the post-update state and the node's directive.
    ///
    /// Precedence: unconditional edge, then goto directive, then conditional edge; with none
    /// of these the node is a dead end. Returns [`END`] when the run should finish.
    pub fn next(&self, from: &str, state: &State, directive: &Next) -> Result<String, RunError> {
        if let Some(to) = self.direct(from) {
            return Ok(to.to_string());
        }
        match directive {
            Next::Node(id) => return Ok(id.clone()),
            Next::End => return Ok(END.to_string()),
            Next::Continue => {}
        }
        match self.conditional(from) {
            Some(edge) => edge.route(from, state),
            None => Err(RunError::DeadEndNode(from.to_string())),
        }
    }
}
