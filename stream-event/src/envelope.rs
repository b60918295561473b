//! Envelope fields (`session_id`, `node_id`, `event_id`) and per-run envelope state.

use crate::event::ProtocolEvent;
use serde_json::Value;

const FIRST_RUN_ID: &str = "run-0";

/// Envelope attached to every event line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    /// Constant within a session.
    pub session_id: Option<String>,
    /// Node run id for the current span (from `node_enter` until the next `node_enter`).
    pub node_id: Option<String>,
    /// Monotonically increasing within a stream.
    pub event_id: Option<u64>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_node_id(mut self, id: impl Into<String>) -> Self {
        self.node_id = Some(id.into());
        self
    }

    pub fn with_event_id(mut self, id: u64) -> Self {
        self.event_id = Some(id);
        self
    }

    /// Adds the envelope keys to a JSON object. Keys already present win.
    /// Non-object values are left alone.
    pub fn inject_into(&self, value: &mut Value) {
        let Some(obj) = value.as_object_mut() else {
            return;
        };
        if let Some(id) = &self.session_id {
            obj.entry("session_id")
                .or_insert_with(|| Value::String(id.clone()));
        }
        if let Some(id) = &self.node_id {
            obj.entry("node_id")
                .or_insert_with(|| Value::String(id.clone()));
        }
        if let Some(id) = self.event_id {
            obj.entry("event_id").or_insert_with(|| Value::from(id));
        }
    }
}

/// Envelope bookkeeping for one run.
#[derive(Debug)]
pub struct EnvelopeState {
    pub session_id: String,
    pub current_node_id: String,
    pub node_run_seq: u64,
    pub next_event_id: u64,
}

impl EnvelopeState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            current_node_id: String::new(),
            node_run_seq: 0,
            next_event_id: 1,
        }
    }

    fn node_id(&self) -> &str {
        if self.current_node_id.is_empty() {
            FIRST_RUN_ID
        } else {
            &self.current_node_id
        }
    }

    /// Injects the envelope and advances the event counter. A `node_enter`
    /// event opens a new node-run span named `run-<node>-<seq>`.
    pub fn inject_into(&mut self, value: &mut Value) {
        if value.get("type").and_then(Value::as_str) == Some("node_enter") {
            let node = value.get("id").and_then(Value::as_str).unwrap_or_default();
            self.current_node_id = format!("run-{}-{}", node, self.node_run_seq);
            self.node_run_seq += 1;
        }
        let envelope = Envelope::new()
            .with_session_id(&self.session_id)
            .with_node_id(self.node_id())
            .with_event_id(self.next_event_id);
        self.next_event_id += 1;
        envelope.inject_into(value);
    }

    /// Envelope for the final reply line; does not advance the counter.
    pub fn reply_envelope(&self) -> Envelope {
        Envelope::new()
            .with_session_id(&self.session_id)
            .with_node_id(self.node_id())
            .with_event_id(self.next_event_id)
    }
}

/// Serializes `event` and injects the envelope from `state`.
pub fn to_json(event: &ProtocolEvent, state: &mut EnvelopeState) -> Result<Value, serde_json::Error> {
    let mut value = event.to_value()?;
    state.inject_into(&mut value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_does_not_overwrite_existing_keys() {
        let mut obj = json!({"type": "custom", "session_id": "keep"});
        Envelope::new()
            .with_session_id("other")
            .with_event_id(7)
            .inject_into(&mut obj);
        assert_eq!(obj["session_id"], "keep");
        assert_eq!(obj["event_id"], 7);
    }

    #[test]
    fn node_enter_opens_new_span_and_ids_increase() {
        let mut state = EnvelopeState::new("sess-1");
        let enter = ProtocolEvent::NodeEnter {
            id: "weather".to_string(),
        };
        let ui = ProtocolEvent::Ui {
            ui_id: "u".to_string(),
            name: "weather".to_string(),
            props: json!({}),
        };

        let first = to_json(&enter, &mut state).unwrap();
        let second = to_json(&ui, &mut state).unwrap();

        assert_eq!(first["node_id"], "run-weather-0");
        assert_eq!(second["node_id"], "run-weather-0");
        assert_eq!(first["event_id"], 1);
        assert_eq!(second["event_id"], 2);
        assert_eq!(second["session_id"], "sess-1");
        assert_eq!(state.reply_envelope().event_id, Some(3));
    }

    #[test]
    fn events_before_any_node_use_first_run_id() {
        let mut state = EnvelopeState::new("s");
        let value = to_json(&ProtocolEvent::Custom { value: json!(1) }, &mut state).unwrap();
        assert_eq!(value["node_id"], "run-0");
    }
}
