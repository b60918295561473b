//! Graph node trait and routing result.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::RunContext;

/// Next step after running a node.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Follow the edge chain; after the last node this ends the run.
    Continue,
    /// Run the node with this id next.
    Node(String),
    /// Stop and return the current state.
    End,
}

/// One step in a graph: state in, (state update, next step) out.
///
/// What the returned state means depends on the graph's `StateUpdater`: with
/// the default replace updater it is the new state; with a reducer it is a
/// partial update.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"weather"`). Unique within a graph.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;

    /// Variant with the run context (config, streaming, UI emitter).
    ///
    /// Defaults to `run`, ignoring the context.
    async fn run_with_context(
        &self,
        state: S,
        _ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        self.run(state).await
    }
}
