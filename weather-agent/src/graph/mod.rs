//! State graph: nodes plus a linear chain of edges, compile, then invoke or stream.
//!
//! The weather graph is a single node (`START → weather → END`), but the
//! runtime is generic over the state type.

mod compile_error;
mod compiled;
mod logging;
mod node;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_state_update,
};
pub use node::{Next, Node};
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
