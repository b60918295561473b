//! Best-effort UI push: structured cards handed to the frontend alongside messages.
//!
//! A push needs a [`RunContext`]: outside a graph run there is nowhere to
//! deliver the card and [`push_ui_message`] fails with
//! [`UiPushError::NoRunContext`]. Callers treat exactly that variant as a
//! no-op; every other error is a genuine emitter fault and propagates.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::graph::RunContext;

/// Component name of the weather card.
pub const WEATHER_COMPONENT: &str = "weather";

/// A UI event: component name plus props, with its own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessage {
    pub id: String,
    pub name: String,
    pub props: Value,
    /// Id of the assistant message this card belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl UiMessage {
    /// Builds a message with a fresh UUID v4 id.
    pub fn new(name: impl Into<String>, props: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            props,
            message_id: None,
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }
}

/// Why a UI push did not happen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiPushError {
    /// Called outside a graph run (e.g. a node invoked directly in a unit test).
    #[error("ui push outside of a run context")]
    NoRunContext,
    /// The emitter refused the message.
    #[error("ui emitter rejected message: {0}")]
    Rejected(String),
    /// Props could not be serialized to JSON.
    #[error("ui props serialization: {0}")]
    Serialize(String),
}

impl UiPushError {
    pub fn is_missing_context(&self) -> bool {
        matches!(self, UiPushError::NoRunContext)
    }
}

/// Sink for UI messages, attached to a run with [`RunContext::with_ui_emitter`].
pub trait UiEmitter: Send + Sync {
    fn emit(&self, message: &UiMessage) -> Result<(), UiPushError>;
}

/// Emitter that keeps every pushed message in memory.
#[derive(Debug, Default)]
pub struct RecordingUiEmitter {
    messages: Mutex<Vec<UiMessage>>,
}

impl RecordingUiEmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything pushed so far.
    pub fn messages(&self) -> Vec<UiMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl UiEmitter for RecordingUiEmitter {
    fn emit(&self, message: &UiMessage) -> Result<(), UiPushError> {
        self.messages
            .lock()
            .map_err(|_| UiPushError::Rejected("recording emitter poisoned".into()))?
            .push(message.clone());
        Ok(())
    }
}

/// Pushes a UI component for the current run.
///
/// With a context: the message goes to the context's emitter (if any) and is sent
/// as `StreamEvent::Ui` when the `Ui` stream mode is on. The built message is
/// returned so the caller can record it in state.
pub async fn push_ui_message<S, P>(
    ctx: Option<&RunContext<S>>,
    name: &str,
    props: &P,
    message_id: Option<&str>,
) -> Result<UiMessage, UiPushError>
where
    S: Clone + Send + Sync + Debug + 'static,
    P: Serialize + ?Sized,
{
    let ctx = ctx.ok_or(UiPushError::NoRunContext)?;
    let props = serde_json::to_value(props).map_err(|e| UiPushError::Serialize(e.to_string()))?;
    let mut message = UiMessage::new(name, props);
    if let Some(id) = message_id {
        message = message.with_message_id(id);
    }
    if let Some(emitter) = ctx.ui_emitter() {
        emitter.emit(&message)?;
    }
    ctx.stream_writer().emit_ui(message.clone()).await;
    tracing::debug!(ui_id = %message.id, name = %message.name, "ui message pushed");
    Ok(message)
}
