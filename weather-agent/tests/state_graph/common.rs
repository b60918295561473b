//! Shared nodes for StateGraph integration tests.

use async_trait::async_trait;
use weather_agent::{AgentError, Message, Next, Node, WeatherState};

/// Echoes the last user message back as an assistant message (full-state output).
pub struct EchoNode;

#[async_trait]
impl Node<WeatherState> for EchoNode {
    fn id(&self) -> &str {
        "echo"
    }

    async fn run(&self, state: WeatherState) -> Result<(WeatherState, Next), AgentError> {
        let mut messages = state.messages.clone();
        if let Some(text) = state.last_user_text() {
            messages.push(Message::assistant(text));
        }
        Ok((
            WeatherState {
                messages,
                ui: state.ui,
            },
            Next::Continue,
        ))
    }
}

/// Adds a fixed greeting as a partial update.
pub struct GreeterNode;

#[async_trait]
impl Node<WeatherState> for GreeterNode {
    fn id(&self) -> &str {
        "greeter"
    }

    async fn run(&self, _state: WeatherState) -> Result<(WeatherState, Next), AgentError> {
        Ok((
            WeatherState {
                messages: vec![Message::assistant("你好！")],
                ui: vec![],
            },
            Next::Continue,
        ))
    }
}

/// Always fails. Used to test error propagation.
pub struct FailingNode;

#[async_trait]
impl Node<WeatherState> for FailingNode {
    fn id(&self) -> &str {
        "failing"
    }

    async fn run(&self, _state: WeatherState) -> Result<(WeatherState, Next), AgentError> {
        Err(AgentError::ExecutionFailed("always fails".into()))
    }
}
