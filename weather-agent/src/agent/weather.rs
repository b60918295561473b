//! Weather node: last user message → assistant reply + `"weather"` UI card.
//!
//! The node is stateless between turns. The fallback city for turns that name
//! no catalog city comes from, in order: `configurable["default_city"]` of the
//! run config, the node's own [`FallbackPolicy`], and finally a uniform random
//! pick from a per-turn RNG ([`RngSource`]).

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::WeatherSettings;
use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, Next, Node, RunContext, StateGraph, END, START};
use crate::message::Message;
use crate::respond::{FallbackPolicy, Responder, TurnOutput};
use crate::state::{WeatherState, WeatherStateUpdater};
use crate::ui::{push_ui_message, WEATHER_COMPONENT};

pub const WEATHER_NODE_ID: &str = "weather";

pub const WEATHER_GRAPH_NAME: &str = "Weather Agent";

/// Where the per-turn fallback RNG comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RngSource {
    /// Thread-local OS-seeded RNG; fallback picks vary between turns.
    #[default]
    Entropy,
    /// A fresh `StdRng` from this seed every turn; the same input always gets the same city.
    Seeded(u64),
}

impl RngSource {
    fn respond(&self, responder: &Responder, text: Option<&str>, fallback: &FallbackPolicy) -> TurnOutput {
        match *self {
            RngSource::Entropy => responder.respond_with_fallback(text, fallback, &mut rand::thread_rng()),
            RngSource::Seeded(seed) => {
                responder.respond_with_fallback(text, fallback, &mut StdRng::seed_from_u64(seed))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherNode {
    responder: Responder,
    rng: RngSource,
}

impl WeatherNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responder(mut self, responder: Responder) -> Self {
        self.responder = responder;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.responder = self.responder.with_fallback(fallback);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RngSource::Seeded(seed);
        self
    }

    /// Node configured from process settings (default city and seed).
    pub fn from_settings(settings: &WeatherSettings) -> Self {
        let node = Self::new().with_fallback(settings.fallback_policy());
        match settings.seed {
            Some(seed) => node.with_seed(seed),
            None => node,
        }
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn rng_source(&self) -> RngSource {
        self.rng
    }

    /// A non-blank `default_city` in the run config overrides the node's policy.
    fn fallback_for(&self, ctx: Option<&RunContext<WeatherState>>) -> FallbackPolicy {
        match ctx.and_then(|c| c.config.default_city()).map(str::trim) {
            Some(city) if !city.is_empty() => FallbackPolicy::Fixed(city.to_string()),
            _ => self.responder.fallback().clone(),
        }
    }

    /// Answers the last user message and pushes the card; returns the partial update.
    async fn step(
        &self,
        state: &WeatherState,
        ctx: Option<&RunContext<WeatherState>>,
    ) -> Result<WeatherState, AgentError> {
        let fallback = self.fallback_for(ctx);
        let turn = self
            .rng
            .respond(&self.responder, state.last_user_text().as_deref(), &fallback);

        let message = Message::assistant(turn.message);
        let mut update = WeatherState {
            messages: Vec::new(),
            ui: Vec::new(),
        };

        match push_ui_message(ctx, WEATHER_COMPONENT, &turn.card, message.id.as_deref()).await {
            Ok(ui) => update.ui.push(ui),
            Err(e) if e.is_missing_context() => {
                tracing::debug!(city = %turn.card.city, "no run context; weather card not pushed");
            }
            Err(e) => return Err(e.into()),
        }
        update.messages.push(message);
        Ok(update)
    }
}

#[async_trait]
impl Node<WeatherState> for WeatherNode {
    fn id(&self) -> &str {
        WEATHER_NODE_ID
    }

    /// Direct call without a run: the reply is produced, the UI push is skipped.
    async fn run(&self, state: WeatherState) -> Result<(WeatherState, Next), AgentError> {
        let update = self.step(&state, None).await?;
        Ok((update, Next::Continue))
    }

    async fn run_with_context(
        &self,
        state: WeatherState,
        ctx: &RunContext<WeatherState>,
    ) -> Result<(WeatherState, Next), AgentError> {
        let update = self.step(&state, Some(ctx)).await?;
        Ok((update, Next::Continue))
    }
}

/// `START → weather → END`, named [`WEATHER_GRAPH_NAME`], with a default [`WeatherNode`].
pub fn build_weather_graph() -> Result<CompiledStateGraph<WeatherState>, CompilationError> {
    build_weather_graph_with(WeatherNode::new())
}

/// Same graph around a caller-configured node.
pub fn build_weather_graph_with(
    node: WeatherNode,
) -> Result<CompiledStateGraph<WeatherState>, CompilationError> {
    let mut graph = StateGraph::<WeatherState>::new()
        .with_name(WEATHER_GRAPH_NAME)
        .with_state_updater(Arc::new(WeatherStateUpdater));
    graph.add_node(WEATHER_NODE_ID, Arc::new(node));
    graph.add_edge(START, WEATHER_NODE_ID);
    graph.add_edge(WEATHER_NODE_ID, END);
    graph.compile()
}
