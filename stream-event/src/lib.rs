//! Stream event wire protocol: `type` + payload, plus an envelope.
//!
//! This crate knows nothing about graph state types. `weather_agent::stream`
//! serializes its `StreamEvent<S>` into [`ProtocolEvent`] and calls [`to_json`].

pub mod envelope;
pub mod event;

pub use envelope::{to_json, Envelope, EnvelopeState};
pub use event::ProtocolEvent;
