//! StateGraph compile failure cases: unknown node, missing START/END, branches, cycles.

use std::sync::Arc;

use weather_agent::{CompilationError, StateGraph, WeatherNode, WeatherState, END, START};

use crate::common::EchoNode;

/// **Scenario**: an edge to a node never added fails with NodeNotFound.
#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_edge(START, "weather");
    graph.add_edge("weather", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        Err(e) => panic!("expected NodeNotFound, got {:?}", e),
        Ok(_) => panic!("expected NodeNotFound"),
    }
}

/// **Scenario**: no edge from START fails with MissingStart.
#[test]
fn compile_fails_when_no_edge_from_start() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_edge("weather", END);

    match graph.compile() {
        Err(CompilationError::MissingStart) => {}
        Err(e) => panic!("expected MissingStart, got {:?}", e),
        Ok(_) => panic!("expected MissingStart"),
    }
}

/// **Scenario**: no edge into END fails with MissingEnd.
#[test]
fn compile_fails_when_no_edge_to_end() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_edge(START, "weather");

    match graph.compile() {
        Err(CompilationError::MissingEnd) => {}
        Err(e) => panic!("expected MissingEnd, got {:?}", e),
        Ok(_) => panic!("expected MissingEnd"),
    }
}

/// **Scenario**: two edges out of START is a branch.
#[test]
fn compile_fails_when_branch_from_start() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_node("echo", Arc::new(EchoNode));
    graph.add_edge(START, "weather");
    graph.add_edge(START, "echo");
    graph.add_edge("weather", END);
    graph.add_edge("echo", END);

    assert!(matches!(graph.compile(), Err(CompilationError::InvalidChain(_))));
}

/// **Scenario**: a loop back to an earlier node is rejected.
#[test]
fn compile_fails_on_cycle() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_node("echo", Arc::new(EchoNode));
    graph.add_node("tail", Arc::new(EchoNode));
    graph.add_edge(START, "weather");
    graph.add_edge("weather", "echo");
    graph.add_edge("echo", "weather");
    graph.add_edge("tail", END);

    match graph.compile() {
        Err(CompilationError::InvalidChain(reason)) => assert!(reason.contains("cycle")),
        Err(e) => panic!("expected InvalidChain, got {:?}", e),
        Ok(_) => panic!("expected InvalidChain"),
    }
}
