//! Conversation state for the weather graph and its reducers.
//!
//! A node returns a partial update (only the messages and UI cards it adds);
//! [`WeatherStateUpdater`] merges it into the running state:
//! messages through [`add_messages`], cards through [`ui_message_reducer`].

use serde::{Deserialize, Serialize};

use crate::catalog::WeatherRecord;
use crate::channels::StateUpdater;
use crate::message::{last_user_text, Message};
use crate::ui::{UiMessage, WEATHER_COMPONENT};

/// Messages plus pushed UI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub ui: Vec<UiMessage>,
}

impl WeatherState {
    /// State holding a single user message.
    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(text.into())],
            ui: Vec::new(),
        }
    }

    pub fn last_user_text(&self) -> Option<String> {
        last_user_text(&self.messages)
    }

    /// Most recent `"weather"` card, decoded.
    pub fn last_weather_card(&self) -> Option<WeatherRecord> {
        self.ui
            .iter()
            .rev()
            .find(|u| u.name == WEATHER_COMPONENT)
            .and_then(|u| serde_json::from_value(u.props.clone()).ok())
    }
}

/// Appends `update` to `current`; a message whose id already exists replaces it in place.
pub fn add_messages(current: &mut Vec<Message>, update: &[Message]) {
    for message in update {
        let existing = message
            .id
            .as_ref()
            .and_then(|id| current.iter().position(|m| m.id.as_ref() == Some(id)));
        match existing {
            Some(pos) => current[pos] = message.clone(),
            None => current.push(message.clone()),
        }
    }
}

/// Appends `update` to `current`; a card with an existing id replaces it in place.
pub fn ui_message_reducer(current: &mut Vec<UiMessage>, update: &[UiMessage]) {
    for message in update {
        match current.iter().position(|u| u.id == message.id) {
            Some(pos) => current[pos] = message.clone(),
            None => current.push(message.clone()),
        }
    }
}

/// Merges a node's partial `WeatherState` into the running state.
#[derive(Debug, Clone, Default)]
pub struct WeatherStateUpdater;

impl StateUpdater<WeatherState> for WeatherStateUpdater {
    fn apply_update(&self, current: &mut WeatherState, update: &WeatherState) {
        add_messages(&mut current.messages, &update.messages);
        ui_message_reducer(&mut current.ui, &update.ui);
    }
}
