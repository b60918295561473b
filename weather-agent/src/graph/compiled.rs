//! Compiled state graph: immutable, runs via `invoke` or `stream`.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::channels::BoxedStateUpdater;
use crate::config::RunnableConfig;
use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_state_update,
};
use super::state_graph::END;
use super::{Next, Node, RunContext};

const STREAM_CHANNEL_CAPACITY: usize = 128;

/// Created by `StateGraph::compile`. Runs from the first node; after each node
/// its `Next` decides between following the chain, jumping, or stopping.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) name: String,
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// Chain order starting at the node after START.
    pub(super) edge_order: Vec<String>,
    /// node id → successor id (may be END).
    pub(super) next_map: HashMap<String, String>,
    pub(super) state_updater: BoxedStateUpdater<S>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node ids in chain order.
    pub fn node_ids(&self) -> &[String] {
        &self.edge_order
    }

    async fn run_loop(&self, state: &mut S, ctx: &RunContext<S>) -> Result<(), AgentError> {
        let mut current_id = self
            .edge_order
            .first()
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed("empty graph".into()))?;
        log_graph_start(&self.name);

        loop {
            let node = match self.nodes.get(&current_id) {
                Some(node) => node.clone(),
                None => {
                    let err = AgentError::ExecutionFailed(format!("unknown node: {current_id}"));
                    log_graph_error(&self.name, &err);
                    return Err(err);
                }
            };
            log_node_start(&current_id);
            log_node_state(&current_id, &*state);

            ctx.send_if(StreamMode::Tasks, || StreamEvent::TaskStart {
                node_id: current_id.clone(),
            })
            .await;

            let (update, next) = match node.run_with_context(state.clone(), ctx).await {
                Ok(output) => output,
                Err(e) => {
                    ctx.send_if(StreamMode::Tasks, || StreamEvent::TaskEnd {
                        node_id: current_id.clone(),
                        result: Err(e.to_string()),
                    })
                    .await;
                    log_graph_error(&self.name, &e);
                    return Err(e);
                }
            };

            ctx.send_if(StreamMode::Tasks, || StreamEvent::TaskEnd {
                node_id: current_id.clone(),
                result: Ok(()),
            })
            .await;
            log_node_complete(&current_id, &next);

            self.state_updater.apply_update(state, &update);
            log_state_update(&current_id);

            ctx.send_if(StreamMode::Values, || StreamEvent::Values(state.clone()))
                .await;
            ctx.send_if(StreamMode::Updates, || StreamEvent::Updates {
                node_id: current_id.clone(),
                state: update.clone(),
            })
            .await;

            let next_id = match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => self.next_map.get(&current_id).cloned(),
            };
            match next_id {
                Some(id) if id != END => current_id = id,
                _ => break,
            }
        }

        log_graph_complete(&self.name);
        Ok(())
    }

    /// Runs the graph to completion and returns the final state.
    ///
    /// Nodes get a [`RunContext`] built from `config` (or the default config)
    /// with no stream and no UI emitter.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        self.invoke_with_context(state, RunContext::new(config.unwrap_or_default()))
            .await
    }

    /// Runs the graph with a caller-built context (e.g. one carrying a UI emitter).
    pub async fn invoke_with_context(&self, state: S, ctx: RunContext<S>) -> Result<S, AgentError> {
        let mut state = state;
        self.run_loop(&mut state, &ctx).await?;
        Ok(state)
    }

    /// Streams the run: events for the selected modes arrive on the returned stream,
    /// which closes when the run ends.
    ///
    /// Must be called inside a Tokio runtime; the run is spawned as a task.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        self.stream_with_context(state, RunContext::new(config.unwrap_or_default()), stream_mode)
    }

    /// Like [`stream`](Self::stream) with a caller-built context; its stream
    /// sender and modes are replaced.
    pub fn stream_with_context(
        &self,
        state: S,
        ctx: RunContext<S>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let graph = self.clone();
        let modes: HashSet<StreamMode> = stream_mode.into();
        let ctx = ctx.with_stream(tx, modes);

        tokio::spawn(async move {
            let mut state = state;
            // errors are already logged by run_loop and surfaced as TaskEnd
            let _ = graph.run_loop(&mut state, &ctx).await;
        });

        ReceiverStream::new(rx)
    }
}
