//! Agent execution error types.
//!
//! Returned by `Node::run` and by `CompiledStateGraph::invoke` when a step fails.

use thiserror::Error;

use crate::ui::UiPushError;

/// Agent execution error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. empty graph, node failure).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The UI emitter rejected a push for a reason other than a missing run context.
    #[error("ui push failed: {0}")]
    UiPush(#[from] UiPushError),
}
