//! # Weather Agent
//!
//! A single-node conversational weather agent built on a small **state-in,
//! state-out** graph runtime. Each turn reads the latest user message, maps it
//! to one of five catalog cities (or none), and answers with a Chinese weather
//! description plus a structured `"weather"` UI card.
//!
//! ## Design principles
//!
//! - **Closed vocabulary**: [`extract_city`] only ever returns a catalog city or `None`.
//!   It is an ordered chain of [`CityMatcher`]s: a leftmost substring scan, then
//!   query templates (`查询X的天气`, `X天气怎么样`, `今天X天气`, `X天气`).
//! - **Injected randomness**: turns without a city fall back to a random catalog
//!   record; the RNG is a parameter ([`Responder::respond`]) or a node setting ([`RngSource`]).
//! - **Best-effort UI**: [`push_ui_message`] outside a run fails with
//!   [`UiPushError::NoRunContext`], which the node swallows; every other emitter error propagates.
//! - **Partial updates**: [`WeatherNode`] returns only what it adds; [`WeatherStateUpdater`]
//!   merges messages and cards by id.
//!
//! ## Main modules
//!
//! - [`catalog`]: [`WeatherRecord`], [`Catalog`] (the five built-in cities).
//! - [`extract`]: [`CityExtractor`], [`CityMatcher`], [`extract_city`].
//! - [`respond`]: [`Responder`], [`FallbackPolicy`], [`TurnOutput`].
//! - [`agent`]: [`WeatherNode`], [`build_weather_graph`].
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`RunContext`].
//! - [`stream`]: [`StreamMode`], [`StreamEvent`], [`StreamWriter`], [`to_protocol_event`].
//! - [`config`]: [`RunnableConfig`] (per run, `configurable["default_city"]`) and
//!   [`WeatherSettings`] (process env, `.env`, XDG `config.toml`).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use weather_agent::{build_weather_graph, RunnableConfig, WeatherState};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = build_weather_graph()?;
//! let config = RunnableConfig::default().with_default_city("北京");
//! let state = graph.invoke(WeatherState::from_user("今天天气怎么样？"), Some(config)).await?;
//! println!("{}", state.messages.last().map(|m| m.text()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! Run the demo: `cargo run -p weather-agent-examples --example weather_demo`

pub mod agent;
pub mod catalog;
pub mod channels;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod message;
pub mod respond;
pub mod state;
pub mod stream;
pub mod ui;

pub use agent::{
    build_weather_graph, build_weather_graph_with, RngSource, WeatherNode, WEATHER_GRAPH_NAME,
    WEATHER_NODE_ID,
};
pub use catalog::{Catalog, CatalogError, CatalogIter, WeatherRecord};
pub use channels::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
pub use config::{RunnableConfig, SettingsError, WeatherSettings, DEFAULT_CITY_KEY};
pub use error::AgentError;
pub use extract::{extract_city, CityExtractor, CityMatcher, PatternMatcher, SubstringScan};
pub use graph::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_state_update, CompilationError, CompiledStateGraph, Next, Node, RunContext, StateGraph,
    END, START,
};
pub use message::{last_user_text, ContentItem, ContentPart, Message, MessageContent, Role};
pub use respond::{FallbackPolicy, Responder, TurnOutput};
pub use state::{add_messages, ui_message_reducer, WeatherState, WeatherStateUpdater};
pub use stream::{to_protocol_event, StreamEvent, StreamMode, StreamWriter};
pub use ui::{
    push_ui_message, RecordingUiEmitter, UiEmitter, UiMessage, UiPushError, WEATHER_COMPONENT,
};
