//! How node outputs are merged into graph state.

mod updater;

pub use updater::{BoxedStateUpdater, ReplaceUpdater, StateUpdater};
