//! Graph compilation error.

use thiserror::Error;

/// Returned by `StateGraph::compile` when edges reference unknown nodes or do
/// not form a single chain from START to END.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// An edge names a node that was never added (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("graph must have exactly one edge from START")]
    MissingStart,

    #[error("graph must have an edge to END")]
    MissingEnd,

    /// Branch or cycle.
    #[error("edges must form a single linear chain from START to END: {0}")]
    InvalidChain(String),
}
