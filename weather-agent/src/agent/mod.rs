//! Graph nodes and the prebuilt weather graph.

mod weather;

pub use weather::{
    build_weather_graph, build_weather_graph_with, RngSource, WeatherNode, WEATHER_GRAPH_NAME,
    WEATHER_NODE_ID,
};
