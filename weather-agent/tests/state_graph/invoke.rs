//! StateGraph invoke: default replace semantics, the weather reducer, and error propagation.

use std::sync::Arc;

use weather_agent::{
    AgentError, StateGraph, WeatherNode, WeatherState, WeatherStateUpdater, END, START,
};

use crate::common::{EchoNode, FailingNode, GreeterNode};

/// **Scenario**: without an updater the node output replaces the state.
#[tokio::test]
async fn echo_graph_replaces_state() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("echo", Arc::new(EchoNode));
    graph.add_edge(START, "echo");
    graph.add_edge("echo", END);
    let compiled = graph.compile().expect("graph compiles");

    let out = compiled
        .invoke(WeatherState::from_user("hello"), None)
        .await
        .unwrap();
    assert_eq!(out.messages.len(), 2);
    assert_eq!(out.messages[1].text(), "hello");
}

/// **Scenario**: greeter then weather with the reducer appends both replies after the user message.
#[tokio::test]
async fn greeter_then_weather_accumulates() {
    let mut graph = StateGraph::<WeatherState>::new()
        .with_name("Greeting Weather")
        .with_state_updater(Arc::new(WeatherStateUpdater));
    graph.add_node("greeter", Arc::new(GreeterNode));
    graph.add_node("weather", Arc::new(WeatherNode::new()));
    graph.add_edge(START, "greeter");
    graph.add_edge("greeter", "weather");
    graph.add_edge("weather", END);
    let compiled = graph.compile().expect("graph compiles");
    assert_eq!(compiled.name(), "Greeting Weather");

    let out = compiled
        .invoke(WeatherState::from_user("广州天气"), None)
        .await
        .unwrap();
    let texts: Vec<_> = out.messages.iter().map(|m| m.text()).collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], "广州天气");
    assert_eq!(texts[1], "你好！");
    assert!(texts[2].contains("广州"));
    assert_eq!(out.ui.len(), 1);
}

/// **Scenario**: a failing node surfaces its error from invoke.
#[tokio::test]
async fn failing_node_error_propagates() {
    let mut graph = StateGraph::<WeatherState>::new();
    graph.add_node("failing", Arc::new(FailingNode));
    graph.add_edge(START, "failing");
    graph.add_edge("failing", END);
    let compiled = graph.compile().expect("graph compiles");

    match compiled.invoke(WeatherState::default(), None).await {
        Err(AgentError::ExecutionFailed(msg)) => assert_eq!(msg, "always fails"),
        Err(e) => panic!("expected ExecutionFailed, got {:?}", e),
        Ok(_) => panic!("expected error"),
    }
}
