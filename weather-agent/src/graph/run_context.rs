//! Run context passed into nodes: config, streaming, and the UI sink.
//!
//! ```rust,ignore
//! async fn run_with_context(&self, state: S, ctx: &RunContext<S>) -> Result<(S, Next), AgentError> {
//!     let city = ctx.config.default_city();
//!     ctx.emit_custom(serde_json::json!({"status": "looking up"})).await;
//!     Ok((state, Next::Continue))
//! }
//! ```

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::RunnableConfig;
use crate::stream::{StreamEvent, StreamMode, StreamWriter};
use crate::ui::UiEmitter;

#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub config: RunnableConfig,
    /// Sender for streaming events; `None` for plain `invoke`.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    pub stream_mode: HashSet<StreamMode>,
    /// Where `push_ui_message` delivers cards besides the stream.
    pub ui_emitter: Option<Arc<dyn UiEmitter>>,
}

impl<S> Debug for RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("config", &self.config)
            .field("streaming", &self.stream_tx.is_some())
            .field("stream_mode", &self.stream_mode)
            .field("ui_emitter", &self.ui_emitter.as_ref().map(|_| "<emitter>"))
            .finish()
    }
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            stream_tx: None,
            stream_mode: HashSet::new(),
            ui_emitter: None,
        }
    }

    pub fn with_ui_emitter(mut self, emitter: Arc<dyn UiEmitter>) -> Self {
        self.ui_emitter = Some(emitter);
        self
    }

    /// Attaches a stream sender and the modes it carries.
    pub fn with_stream(
        mut self,
        tx: mpsc::Sender<StreamEvent<S>>,
        modes: impl IntoIterator<Item = StreamMode>,
    ) -> Self {
        self.stream_tx = Some(tx);
        self.stream_mode = modes.into_iter().collect();
        self
    }

    pub fn ui_emitter(&self) -> Option<&Arc<dyn UiEmitter>> {
        self.ui_emitter.as_ref()
    }

    pub fn stream_writer(&self) -> StreamWriter<S> {
        StreamWriter::new(self.stream_tx.clone(), self.stream_mode.clone())
    }

    pub fn is_streaming_mode(&self, mode: StreamMode) -> bool {
        self.stream_mode.contains(&mode)
    }

    /// Sends a custom payload when `StreamMode::Custom` is on.
    pub async fn emit_custom(&self, value: Value) -> bool {
        self.stream_writer().emit_custom(value).await
    }

    /// Sends `event` if the context streams and `mode` is enabled.
    pub(crate) async fn send_if(&self, mode: StreamMode, event: impl FnOnce() -> StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&mode) {
                let _ = tx.send(event()).await;
            }
        }
    }
}
