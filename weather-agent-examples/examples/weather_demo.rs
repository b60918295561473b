//! Example: the weather agent end to end.
//!
//! Without a message, walks through basic usage, named cities, random
//! fallback, an unsupported city, concurrent calls, `default_city` and the
//! full state as JSON. With a message, answers just that one turn.
//!
//! Run:
//! - `cargo run -p weather-agent-examples --example weather_demo`
//! - `cargo run -p weather-agent-examples --example weather_demo -- "查询上海天气"`
//! - `cargo run -p weather-agent-examples --example weather_demo -- --stream "深圳天气"`
//!
//! `WEATHER_AGENT_DEFAULT_CITY` / `WEATHER_AGENT_SEED` (env, `.env`, or
//! `~/.config/weather-agent/config.toml` under `[env]`) configure the node.

use std::collections::HashSet;
use std::error::Error;

use clap::Parser;
use stream_event::{to_json, EnvelopeState};
use tokio_stream::StreamExt;
use weather_agent::{
    build_weather_graph, build_weather_graph_with, to_protocol_event, Catalog, CompiledStateGraph,
    RecordingUiEmitter, RunContext, RunnableConfig, StreamMode, WeatherNode, WeatherRecord,
    WeatherSettings, WeatherState,
};

#[derive(Parser, Debug)]
#[command(name = "weather_demo", about = "Weather agent demo")]
struct Args {
    /// Answer a single message instead of running the tour.
    message: Option<String>,

    /// Fallback city when the message names none (overrides WEATHER_AGENT_DEFAULT_CITY).
    #[arg(long)]
    default_city: Option<String>,

    /// Print the run as protocol JSON lines.
    #[arg(long)]
    stream: bool,
}

fn condition_icon(condition: &str) -> &'static str {
    match condition {
        "晴天" => "☀️",
        "多云" => "⛅",
        "小雨" => "🌧️",
        "阴天" => "☁️",
        _ => "🌤️",
    }
}

fn render_card(card: &WeatherRecord) -> String {
    format!(
        "┌─────────────────────────────────┐\n\
         │ {icon} {city}\n\
         ├─────────────────────────────────┤\n\
         │ 🌡️ 温度: {temperature}\n\
         │ {icon} 状况: {condition}\n\
         │ 💧 湿度: {humidity}\n\
         │ 💨 风速: {wind}\n\
         ├─────────────────────────────────┤\n\
         │ 📝 {description}\n\
         └─────────────────────────────────┘",
        icon = condition_icon(&card.condition),
        city = card.city,
        temperature = card.temperature,
        condition = card.condition,
        humidity = card.humidity,
        wind = card.wind,
        description = card.description,
    )
}

async fn ask(
    graph: &CompiledStateGraph<WeatherState>,
    text: &str,
    config: RunnableConfig,
) -> Result<WeatherState, Box<dyn Error>> {
    let emitter = RecordingUiEmitter::new();
    let ctx = RunContext::new(config).with_ui_emitter(emitter.clone());
    let state = graph
        .invoke_with_context(WeatherState::from_user(text), ctx)
        .await?;

    println!("👤 用户: {text}");
    if let Some(reply) = state.messages.last() {
        println!("💬 Agent: {}", reply.text());
    }
    match state.last_weather_card() {
        Some(card) => println!("{}", render_card(&card)),
        None => println!("📝 没有天气卡片"),
    }
    print_pushed(&emitter);
    Ok(state)
}

fn print_pushed(emitter: &RecordingUiEmitter) {
    let pushed = emitter.messages();
    if let Some(card) = pushed.last() {
        println!("📡 UI 推送: {} ({})", card.name, card.id);
    }
}

fn city_of(state: &WeatherState) -> String {
    state
        .last_weather_card()
        .map(|c| c.city)
        .unwrap_or_else(|| "未知城市".to_string())
}

async fn stream_turn(
    graph: &CompiledStateGraph<WeatherState>,
    text: &str,
    config: RunnableConfig,
) -> Result<(), Box<dyn Error>> {
    let modes = HashSet::from([
        StreamMode::Tasks,
        StreamMode::Ui,
        StreamMode::Updates,
    ]);
    let mut events = graph.stream(WeatherState::from_user(text), Some(config), modes);
    let mut envelope = EnvelopeState::new("weather-demo");
    while let Some(event) = events.next().await {
        let line = to_json(&to_protocol_event(&event)?, &mut envelope)?;
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

async fn tour(graph: &CompiledStateGraph<WeatherState>) -> Result<(), Box<dyn Error>> {
    let no_config = RunnableConfig::default;

    println!("🔹 基本用法");
    println!("{}", "-".repeat(40));
    ask(graph, "天气怎么样？", no_config()).await?;
    println!();

    println!("🔹 指定城市");
    println!("{}", "-".repeat(40));
    for text in ["北京的天气怎么样？", "查询上海天气", "今天深圳天气如何"] {
        ask(graph, text, no_config()).await?;
        println!();
    }

    println!("🔹 随机选择（未指定城市）");
    println!("{}", "-".repeat(40));
    let random = build_weather_graph()?;
    for i in 1..=3 {
        let state = random
            .invoke(WeatherState::from_user("天气怎么样？"), None)
            .await?;
        println!("🔄 第 {i} 次调用 - 城市: {}", city_of(&state));
    }
    println!();

    println!("🔹 不支持的城市");
    println!("{}", "-".repeat(40));
    let state = ask(graph, "东京的天气怎么样？", no_config()).await?;
    println!("🎯 实际返回的城市: {}", city_of(&state));
    println!();

    println!("🔹 并发调用");
    println!("{}", "-".repeat(40));
    let (a, b, c) = tokio::join!(
        graph.invoke(WeatherState::from_user("北京天气"), None),
        graph.invoke(WeatherState::from_user("上海天气"), None),
        graph.invoke(WeatherState::from_user("深圳天气"), None),
    );
    for (i, result) in [a, b, c].into_iter().enumerate() {
        println!("✅ 调用 {} 完成 - 城市: {}", i + 1, city_of(&result?));
    }
    println!();

    println!("🔹 default_city 配置");
    println!("{}", "-".repeat(40));
    ask(graph, "今天天气如何？", no_config().with_default_city("杭州")).await?;
    println!();

    println!("🔹 数据结构");
    println!("{}", "-".repeat(40));
    let state = graph
        .invoke(WeatherState::from_user("杭州天气怎么样？"), None)
        .await?;
    println!("🔸 消息数量: {}", state.messages.len());
    println!("🔸 UI 组件数量: {}", state.ui.len());
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_config::init_tracing("warn");
    let args = Args::parse();

    let settings = WeatherSettings::load(None)?;
    let graph = build_weather_graph_with(WeatherNode::from_settings(&settings))?;
    let config = match &args.default_city {
        Some(city) => RunnableConfig::default().with_default_city(city.as_str()),
        None => RunnableConfig::default(),
    };

    println!("🌤️  天气 Agent 演示 ({})", graph.name());
    let cities: Vec<&str> = Catalog::builtin().cities().collect();
    println!("📊 可用城市: {}", cities.join(", "));
    println!("{}", "=".repeat(50));

    match args.message {
        Some(text) if args.stream => stream_turn(&graph, &text, config).await?,
        Some(text) => {
            ask(&graph, &text, config).await?;
        }
        None => tour(&graph).await?,
    }

    println!("✅ 完成");
    Ok(())
}
