//! State updaters: merge a node's returned state into the running state.
//!
//! Without an updater the node's output replaces the state wholesale
//! ([`ReplaceUpdater`]). Graphs whose nodes return partial updates, like the
//! weather graph, attach a reducer-style updater instead
//! (see `crate::state::WeatherStateUpdater`).

use std::fmt::Debug;
use std::sync::Arc;

/// Merge strategy applied after every node run.
pub trait StateUpdater<S>: Send + Sync + Debug
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Folds `update` (the node's output) into `current`.
    fn apply_update(&self, current: &mut S, update: &S);
}

/// Shared updater handle stored by `StateGraph` and `CompiledStateGraph`.
pub type BoxedStateUpdater<S> = Arc<dyn StateUpdater<S>>;

/// Replaces the whole state with the node's output.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) {
        *current = update.clone();
    }
}
