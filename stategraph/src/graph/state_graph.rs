//! State graph builder: schema, nodes, unconditional and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` and
//! `add_conditional_edges(from, router, path_map)` using [`START`] and [`END`] for entry and
//! exit, then `compile` or `compile_with_checkpointer` to get a [`CompiledStateGraph`].
//! Compilation validates the structure once; the compiled graph is frozen.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::memory::{Checkpointer, MemorySaver};
use crate::state::{State, StateSchema};

use super::compiled::CompiledStateGraph;
use super::edge::{ConditionalEdge, RouterFn};
use super::logging::log_compile_warning;
use super::validate::{build_edge_table, validate};
use super::{CompilationError, CompileWarning, Node, NodeMiddleware, NodeRegistry};

/// Sentinel for graph entry: use as `from` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Compile-time switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail with [`CompilationError::Unreachable`] instead of warning about nodes that can
    /// never run.
    pub strict: bool,
}

impl CompileOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// State graph: schema plus nodes plus edges.
///
/// **Interaction**: Accepts `Arc<dyn Node>`; produces [`CompiledStateGraph`]. Middleware and
/// options are attached before compiling and frozen with the graph.
pub struct StateGraph {
    schema: StateSchema,
    nodes: NodeRegistry,
    edges: Vec<(String, String)>,
    branches: Vec<(String, ConditionalEdge)>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
    options: CompileOptions,
}

impl StateGraph {
    /// Creates an empty graph over `schema`.
    pub fn new(schema: StateSchema) -> Self {
        Self {
            schema,
            nodes: NodeRegistry::new(),
            edges: Vec::new(),
            branches: Vec::new(),
            middleware: None,
            options: CompileOptions::default(),
        }
    }

    /// Adds a node. Fails with `DuplicateNodeId` when the id is taken and with
    /// `ReservedNodeId` for START/END.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        node: Arc<dyn Node>,
    ) -> Result<&mut Self, CompilationError> {
        self.nodes.register(id, node, Vec::new())?;
        Ok(self)
    }

    /// Adds a node that routes through goto directives, declaring where it may go.
    ///
    /// The destinations are only used by validation (reachability and unknown-id checks);
    /// at run time the node's returned [`Next`](super::Next) decides.
    pub fn add_node_with_destinations<I, D>(
        &mut self,
        id: impl Into<String>,
        node: Arc<dyn Node>,
        destinations: I,
    ) -> Result<&mut Self, CompilationError>
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        let destinations = destinations.into_iter().map(Into::into).collect();
        self.nodes.register(id, node, destinations)?;
        Ok(self)
    }

    /// Adds an unconditional edge from `from` to `to`. Checked at compile time.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Adds a conditional edge: after `from` runs, `router` maps the state to a label and
    /// `path_map` maps the label to the next node (or END).
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use stategraph::{FnNode, NodeOutput, StateGraph, StateSchema, END, START};
    ///
    /// let mut graph = StateGraph::new(StateSchema::new().replace("route"));
    /// graph
    ///     .add_node("a", Arc::new(FnNode::new(|_, _| Ok(NodeOutput::default()))))
    ///     .unwrap()
    ///     .add_edge(START, "a")
    ///     .add_conditional_edges(
    ///         "a",
    ///         |s| s.get_str("route").unwrap_or("end").to_string(),
    ///         [("again", "a"), ("end", END)],
    ///     );
    /// let compiled = graph.compile().unwrap();
    /// assert!(compiled.warnings().is_empty());
    /// ```
    pub fn add_conditional_edges<F, I, K, V>(
        &mut self,
        from: impl Into<String>,
        router: F,
        path_map: I,
    ) -> &mut Self
    where
        F: Fn(&State) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let router: RouterFn = Arc::new(router);
        let path_map: BTreeMap<String, String> = path_map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.branches
            .push((from.into(), ConditionalEdge::new(router, path_map)));
        self
    }

    /// Wraps every node invocation of the compiled graph with `middleware`.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates and freezes the graph; runs are checkpointed in a fresh [`MemorySaver`].
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_with_checkpointer(Arc::new(MemorySaver::new()))
    }

    /// Validates and freezes the graph; runs are checkpointed in `checkpointer`.
    ///
    /// Graphs compiled from the same declarations over the same persistent checkpointer can
    /// resume each other's suspended runs.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        let edges = build_edge_table(self.edges, self.branches)?;
        let warnings = validate(&self.nodes, &edges)?;

        if self.options.strict {
            let unreachable: Vec<String> = warnings
                .iter()
                .filter_map(|w| match w {
                    CompileWarning::UnreachableNode(id) => Some(id.clone()),
                    _ => None,
                })
                .collect();
            if !unreachable.is_empty() {
                return Err(CompilationError::Unreachable(unreachable));
            }
        }
        for warning in &warnings {
            log_compile_warning(warning);
        }

        Ok(CompiledStateGraph::new(
            self.schema,
            self.nodes,
            edges,
            checkpointer,
            self.middleware,
            warnings,
        ))
    }
}
