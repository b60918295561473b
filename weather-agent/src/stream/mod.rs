//! Streaming types for graph runs.
//!
//! [`CompiledStateGraph::stream`](crate::graph::CompiledStateGraph::stream) sends
//! [`StreamEvent`]s for the enabled [`StreamMode`]s over an mpsc channel. Nodes
//! emit their own events through a [`StreamWriter`] obtained from the run
//! context; every emit is a no-op unless its mode is on.
//!
//! [`to_protocol_event`] maps a stream event onto the `stream-event` wire type.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use stream_event::ProtocolEvent;
use tokio::sync::mpsc;

use crate::ui::UiMessage;

/// Which kinds of events a stream carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Full state after each node.
    Values,
    /// Node id plus the update that node returned.
    Updates,
    /// UI components pushed by nodes.
    Ui,
    /// Arbitrary JSON from nodes.
    Custom,
    /// Node start/end markers.
    Tasks,
}

/// One streamed event.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    Values(S),
    Updates { node_id: String, state: S },
    Ui(UiMessage),
    Custom(Value),
    TaskStart {
        node_id: String,
    },
    TaskEnd {
        node_id: String,
        /// `Err` holds the error message of a failed node.
        result: Result<(), String>,
    },
}

/// Mode-aware sender handed to nodes.
#[derive(Clone, Debug)]
pub struct StreamWriter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    tx: Option<mpsc::Sender<StreamEvent<S>>>,
    modes: Arc<HashSet<StreamMode>>,
}

impl<S> StreamWriter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(tx: Option<mpsc::Sender<StreamEvent<S>>>, modes: HashSet<StreamMode>) -> Self {
        Self {
            tx,
            modes: Arc::new(modes),
        }
    }

    /// Writer that drops everything.
    pub fn noop() -> Self {
        Self {
            tx: None,
            modes: Arc::new(HashSet::new()),
        }
    }

    pub fn is_mode_enabled(&self, mode: StreamMode) -> bool {
        self.modes.contains(&mode)
    }

    async fn send(&self, mode: StreamMode, event: StreamEvent<S>) -> bool {
        if !self.modes.contains(&mode) {
            return false;
        }
        match &self.tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Sends `StreamEvent::Custom` when `Custom` is enabled. Returns whether it was sent.
    pub async fn emit_custom(&self, value: Value) -> bool {
        self.send(StreamMode::Custom, StreamEvent::Custom(value)).await
    }

    /// Sends `StreamEvent::Ui` when `Ui` is enabled. Returns whether it was sent.
    pub async fn emit_ui(&self, message: UiMessage) -> bool {
        self.send(StreamMode::Ui, StreamEvent::Ui(message)).await
    }
}

impl<S> Default for StreamWriter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::noop()
    }
}

/// Converts a stream event to its wire form; state is serialized to JSON.
pub fn to_protocol_event<S>(event: &StreamEvent<S>) -> Result<ProtocolEvent, serde_json::Error>
where
    S: Clone + Send + Sync + Debug + Serialize + 'static,
{
    Ok(match event {
        StreamEvent::Values(state) => ProtocolEvent::Values {
            state: serde_json::to_value(state)?,
        },
        StreamEvent::Updates { node_id, state } => ProtocolEvent::Updates {
            id: node_id.clone(),
            state: serde_json::to_value(state)?,
        },
        StreamEvent::Ui(message) => ProtocolEvent::Ui {
            ui_id: message.id.clone(),
            name: message.name.clone(),
            props: message.props.clone(),
        },
        StreamEvent::Custom(value) => ProtocolEvent::Custom {
            value: value.clone(),
        },
        StreamEvent::TaskStart { node_id } => ProtocolEvent::NodeEnter {
            id: node_id.clone(),
        },
        StreamEvent::TaskEnd { node_id, result } => ProtocolEvent::NodeExit {
            id: node_id.clone(),
            result: match result {
                Ok(()) => Value::String("ok".into()),
                Err(e) => serde_json::json!({ "error": e }),
            },
        },
    })
}
