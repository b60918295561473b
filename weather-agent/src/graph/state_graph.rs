//! State graph builder: nodes plus explicit edges (from → to).
//!
//! Add nodes with `add_node`, chain them with `add_edge(from, to)` using
//! [`START`] and [`END`] for entry and exit, then `compile`. Node outputs replace
//! the state unless a `StateUpdater` is attached with `with_state_updater`.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::channels::{BoxedStateUpdater, ReplaceUpdater};

use super::compile_error::CompilationError;
use super::compiled::CompiledStateGraph;
use super::node::Node;

/// Entry sentinel: `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Exit sentinel: `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

const DEFAULT_GRAPH_NAME: &str = "graph";

pub struct StateGraph<S> {
    name: String,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// (from_id, to_id), in insertion order.
    edges: Vec<(String, String)>,
    state_updater: Option<BoxedStateUpdater<S>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            name: DEFAULT_GRAPH_NAME.to_string(),
            nodes: HashMap::new(),
            edges: Vec::new(),
            state_updater: None,
        }
    }

    /// Display name, used in logs and returned by `CompiledStateGraph::name`.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Controls how node outputs merge into state. Default replaces it.
    pub fn with_state_updater(self, updater: BoxedStateUpdater<S>) -> Self {
        Self {
            state_updater: Some(updater),
            ..self
        }
    }

    /// Adds a node; a second node with the same id replaces the first.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Validates the edges and freezes the graph.
    ///
    /// Every edge endpoint must be a registered node (or START/END), there must
    /// be exactly one edge from START and at least one into END, and the edges
    /// must form one chain without branches or cycles.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }

        let mut start_edges = self.edges.iter().filter(|(f, _)| f == START).map(|(_, t)| t);
        let first = match (start_edges.next(), start_edges.next()) {
            (None, _) => return Err(CompilationError::MissingStart),
            (Some(first), None) => first.clone(),
            (Some(_), Some(_)) => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START (branch)".into(),
                ))
            }
        };
        if first == END {
            return Err(CompilationError::InvalidChain("START connects directly to END".into()));
        }

        if !self.edges.iter().any(|(_, t)| t == END) {
            return Err(CompilationError::MissingEnd);
        }

        let mut next_map: HashMap<String, String> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if next_map.insert(from.clone(), to.clone()).is_some() {
                return Err(CompilationError::InvalidChain(format!(
                    "duplicate edge from {from} (branch)"
                )));
            }
        }

        let mut edge_order = vec![first.clone()];
        let mut visited: HashSet<&str> = HashSet::from([first.as_str()]);
        let mut current = first.as_str();
        while let Some(next) = next_map.get(current) {
            if next == END {
                break;
            }
            if !visited.insert(next.as_str()) {
                return Err(CompilationError::InvalidChain("cycle detected".into()));
            }
            edge_order.push(next.clone());
            current = next.as_str();
        }

        let state_updater = self
            .state_updater
            .unwrap_or_else(|| Arc::new(ReplaceUpdater));

        Ok(CompiledStateGraph {
            name: self.name,
            nodes: self.nodes,
            edge_order,
            next_map,
            state_updater,
        })
    }
}
