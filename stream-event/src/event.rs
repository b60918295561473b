//! Protocol-level event types. State-carrying variants hold `serde_json::Value`.

use serde::Serialize;
use serde_json::Value;

/// One stream event on the wire.
///
/// `id` in a payload is the node name (e.g. `"weather"`); the node-run span id
/// lives in the envelope as `node_id`. The `ui` variant carries the pushed UI
/// message id as `ui_id` so it does not collide with the node name.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    NodeEnter { id: String },
    NodeExit { id: String, result: Value },
    Values { state: Value },
    Updates { id: String, state: Value },
    Ui {
        ui_id: String,
        name: String,
        props: Value,
    },
    Custom { value: Value },
}

impl ProtocolEvent {
    /// Serializes this event to a JSON object (type + payload only; no envelope).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
