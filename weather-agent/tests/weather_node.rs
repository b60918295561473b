//! Weather node invoked directly, outside a graph run: the reply is produced
//! and the UI push is skipped.


use rand::rngs::StdRng;
use rand::SeedableRng;
use weather_agent::{
    Catalog, ContentPart, FallbackPolicy, Message, Next, Node, Responder, Role, WeatherNode,
    WeatherState,
};

fn reply(update: &WeatherState) -> &Message {
    assert_eq!(update.messages.len(), 1, "node adds exactly one message");
    &update.messages[0]
}

/// **Scenario**: a recognized city yields its description with the weather icon.
#[tokio::test]
async fn recognized_city_reply() {
    let (update, next) = WeatherNode::new()
        .run(WeatherState::from_user("北京的天气怎么样？"))
        .await
        .unwrap();
    let record = Catalog::builtin().get("北京").unwrap();
    let msg = reply(&update);
    assert_eq!(next, Next::Continue);
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.text(), format!("🌤️ {}", record.description));
    assert!(msg.id.as_deref().is_some_and(|id| !id.is_empty()));
}

/// **Scenario**: an empty conversation still gets a reply about some catalog city.
#[tokio::test]
async fn empty_state_gets_random_city() {
    let (update, _) = WeatherNode::new().run(WeatherState::default()).await.unwrap();
    let text = reply(&update).text();
    assert!(text.starts_with("🌤️ "));
    assert!(
        Catalog::builtin().iter().any(|r| text.contains(&r.description)),
        "reply should carry a catalog description: {text}"
    );
    assert!(update.ui.is_empty());
}

/// **Scenario**: an unsupported city falls back to a catalog city without an apology.
#[tokio::test]
async fn unsupported_city_falls_back() {
    let (update, _) = WeatherNode::new()
        .run(WeatherState::from_user("东京的天气"))
        .await
        .unwrap();
    let text = reply(&update).text();
    assert!(!text.contains("抱歉"));
    assert!(Catalog::builtin().iter().any(|r| text.contains(&r.description)));
}

/// **Scenario**: only the latest user message counts, not earlier turns or assistant text.
#[tokio::test]
async fn latest_user_message_wins() {
    let state = WeatherState {
        messages: vec![
            Message::user("北京天气"),
            Message::assistant("🌤️ 上海今天多云"),
            Message::user("那深圳呢？深圳天气"),
        ],
        ui: vec![],
    };
    let (update, _) = WeatherNode::new().run(state).await.unwrap();
    assert!(reply(&update).text().contains("深圳"));
}

/// **Scenario**: list-shaped content is flattened to text before extraction.
#[tokio::test]
async fn content_parts_are_joined() {
    let state = WeatherState {
        messages: vec![Message::user(vec![
            ContentPart::text("请问"),
            ContentPart::text("杭州天气"),
        ])],
        ui: vec![],
    };
    let (update, _) = WeatherNode::new().run(state).await.unwrap();
    assert!(reply(&update).text().contains("杭州"));
}

/// **Scenario**: a state deserialized with bare-string list content still reaches extraction.
#[tokio::test]
async fn string_list_content_from_json() {
    let state: WeatherState = serde_json::from_str(
        r#"{"messages":[{"role":"user","content":["请问", {"type":"text","text":"深圳"}, "天气"]}]}"#,
    )
    .unwrap();
    let (update, _) = WeatherNode::new().run(state).await.unwrap();
    assert!(reply(&update).text().contains("深圳"));
}

/// **Scenario**: the input state is consumed by value and the update contains only the new reply.
#[tokio::test]
async fn update_does_not_repeat_input() {
    let input = WeatherState::from_user("广州天气");
    let snapshot = input.clone();
    let (update, _) = WeatherNode::new().run(input.clone()).await.unwrap();
    assert_eq!(input, snapshot);
    assert!(update.messages.iter().all(|m| m.role == Role::Assistant));
}

/// **Scenario**: a fixed fallback applies only when the user names no city.
#[tokio::test]
async fn fixed_fallback_node() {
    let node = WeatherNode::new().with_fallback(FallbackPolicy::Fixed("上海".into()));
    let (update, _) = node.run(WeatherState::from_user("天气怎么样？")).await.unwrap();
    assert!(reply(&update).text().contains("上海"));
    let (update, _) = node.run(WeatherState::from_user("北京天气")).await.unwrap();
    assert!(reply(&update).text().contains("北京"));
}

/// **Scenario**: the responder can be driven with a caller-supplied deterministic RNG.
#[test]
fn responder_with_injected_rng() {
    let responder = Responder::default();
    let a = responder.respond(Some("你好"), &mut StdRng::seed_from_u64(1));
    let b = responder.respond(Some("你好"), &mut StdRng::seed_from_u64(1));
    assert_eq!(a.card.city, b.card.city);
    for (field, value) in a.card.fields() {
        assert!(!value.is_empty(), "{field} empty");
    }
}
