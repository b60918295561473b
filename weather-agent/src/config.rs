//! Run configuration and process-level settings.
//!
//! - [`RunnableConfig`]: per-invocation config passed to `CompiledStateGraph::invoke`.
//!   Node-specific options live in the free-form `configurable` map; the weather
//!   node reads [`DEFAULT_CITY_KEY`] from it and ignores unknown keys.
//! - [`WeatherSettings`]: process defaults from the environment, which
//!   `env_config::load_and_apply` may have filled from `.env` or XDG `config.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::respond::FallbackPolicy;

/// `configurable` key that pins the no-match fallback city.
pub const DEFAULT_CITY_KEY: &str = "default_city";

/// App name used for `$XDG_CONFIG_HOME/<app>/config.toml`.
pub const APP_NAME: &str = "weather-agent";

pub const ENV_DEFAULT_CITY: &str = "WEATHER_AGENT_DEFAULT_CITY";
pub const ENV_SEED: &str = "WEATHER_AGENT_SEED";

/// Config for one graph run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnableConfig {
    /// Conversation id; informational for the weather graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Free-form node options (e.g. `{"default_city": "北京"}`).
    #[serde(default)]
    pub configurable: Map<String, Value>,
}

impl RunnableConfig {
    pub fn with_configurable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.configurable.insert(key.into(), value.into());
        self
    }

    pub fn with_default_city(self, city: impl Into<String>) -> Self {
        self.with_configurable(DEFAULT_CITY_KEY, city.into())
    }

    /// String value of a `configurable` key; non-string values are ignored.
    pub fn configurable_str(&self, key: &str) -> Option<&str> {
        self.configurable.get(key).and_then(Value::as_str)
    }

    pub fn default_city(&self) -> Option<&str> {
        self.configurable_str(DEFAULT_CITY_KEY)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("load config: {0}")]
    Load(#[from] env_config::LoadError),
    #[error("WEATHER_AGENT_SEED is not an unsigned integer: {0:?}")]
    InvalidSeed(String),
}

/// Process-wide defaults for the weather node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherSettings {
    /// Fallback city when a turn names none; `None` means random.
    pub default_city: Option<String>,
    /// Seed for the fallback RNG; `None` means OS entropy.
    pub seed: Option<u64>,
}

impl WeatherSettings {
    /// Reads [`ENV_DEFAULT_CITY`] and [`ENV_SEED`]. Blank values count as unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        let default_city = non_blank_env(ENV_DEFAULT_CITY);
        let seed = non_blank_env(ENV_SEED)
            .map(|raw| raw.parse::<u64>().map_err(|_| SettingsError::InvalidSeed(raw)))
            .transpose()?;
        Ok(Self { default_city, seed })
    }

    /// Applies `.env` (from `dotenv_dir` or the current directory) and XDG config to
    /// the environment, then reads settings from it.
    pub fn load(dotenv_dir: Option<&Path>) -> Result<Self, SettingsError> {
        let applied = env_config::load_and_apply(APP_NAME, dotenv_dir)?;
        if !applied.is_empty() {
            tracing::debug!(keys = ?applied, "config applied to environment");
        }
        Self::from_env()
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::from_default_city(self.default_city.as_deref())
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
