//! Structured `tracing` events for graph runs.

use std::fmt::Debug;

use crate::error::AgentError;

use super::Next;

pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id = node_id, "Starting node execution");
}

/// Input state of a node, at trace level since weather states carry full message history.
pub fn log_node_state<S: Debug>(node_id: &str, state: &S) {
    tracing::trace!(node_id = node_id, state = ?state, "Node execution: state");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id = node_id, ?next, "Node execution complete");
}

pub fn log_state_update(node_id: &str) {
    tracing::debug!(node_id = node_id, "State updated");
}

pub fn log_graph_start(graph: &str) {
    tracing::info!(graph = graph, "Starting graph execution");
}

pub fn log_graph_complete(graph: &str) {
    tracing::info!(graph = graph, "Graph execution complete");
}

pub fn log_graph_error(graph: &str, error: &AgentError) {
    tracing::error!(graph = graph, %error, "Graph execution error");
}
