//! End-to-end runs of every exercise against a scripted model.

use promptlab::agent::{AgentEvent, CompositeEventHandler, FnEventHandler, NoopHandler};
use promptlab::api::{Reply, ScriptedModel};
use promptlab::exercises::{self, USER_MESSAGES};
use promptlab::{ApiRole, Error, Role, ToolCall};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

fn printed(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

fn calc(id: &str, expression: &str) -> ToolCall {
    ToolCall::function(
        id,
        "Calculator",
        serde_json::json!({ "expression": expression }).to_string(),
    )
}

#[tokio::test]
async fn messages_sends_four_roles_in_order() {
    let model = ScriptedModel::new().otherwise("Slice tomatoes and mozzarella, add basil.");
    let mut out = Vec::new();

    let reply = exercises::messages::run(&model, &mut out).await.unwrap();
    assert_eq!(reply.role(), Role::Ai);
    assert_eq!(
        printed(out),
        "Slice tomatoes and mozzarella, add basil.\n"
    );

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    let roles: Vec<_> = requests[0].messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [ApiRole::System, ApiRole::User, ApiRole::Assistant, ApiRole::User]
    );
}

#[tokio::test]
async fn templates_substitutes_topic() {
    let model = ScriptedModel::new()
        .when("joke about penguins", "Why don't penguins fly? They can't afford tickets.")
        .otherwise("wrong topic");
    let mut out = Vec::new();

    let joke = exercises::templates::run(&model, "penguins", &mut out)
        .await
        .unwrap();
    assert!(joke.contains("penguins"));
    assert_eq!(
        model.requests()[0].last_user_content(),
        Some("Tell me a joke about penguins")
    );
}

#[tokio::test]
async fn chain_collects_name_and_location() {
    let model = ScriptedModel::new()
        .when("ask for their name", "Hello there! What's your name?")
        .when("about their location", "Lovely to meet you, Ann! Where are you from?")
        .when("friendly summary", "Ann lives in Lisbon.");
    let mut input = Cursor::new(b"Ann\nLisbon\n".to_vec());
    let mut out = Vec::new();

    let info = exercises::chain::run(&model, &mut input, &mut out)
        .await
        .unwrap();
    assert_eq!(info.name, "Ann");
    assert_eq!(info.location, "Lisbon");
    assert_eq!(info.summary, "Ann lives in Lisbon.");

    let requests = model.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[1].last_user_content().unwrap().contains("name is Ann"));
    let last = requests[2].last_user_content().unwrap();
    assert!(last.contains("Name: Ann") && last.contains("Location: Lisbon"));

    let text = printed(out);
    assert!(text.contains("Your Name: "));
    assert!(text.contains("\nCollected User Information:\n"));
    assert!(text.contains("\"location\": \"Lisbon\""));
}

#[tokio::test]
async fn sequential_feeds_dish_into_recipe() {
    let model = ScriptedModel::new()
        .when("classic dish from Italy", "Lasagna")
        .when("make Lasagna", "Layer pasta, ragu, and bechamel. Bake for 45 minutes.");
    let mut out = Vec::new();

    let result = exercises::sequential::run(&model, "Italy", &mut out)
        .await
        .unwrap();
    assert_eq!(result.intermediate, "Lasagna");
    assert!(result.output.content().starts_with("Layer pasta"));

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests[1]
            .last_user_content()
            .unwrap()
            .contains("how to make Lasagna at home")
    );

    let text = printed(out);
    assert!(text.starts_with("Cooking up a recipe from Italy...\n"));
    assert!(text.ends_with("Bake for 45 minutes.\n"));
}

#[tokio::test]
async fn sequential_stops_when_first_stage_fails() {
    let model = ScriptedModel::new().when_reply("classic dish", Reply::Fail("overloaded".into()));
    let mut out = Vec::new();

    let err = exercises::sequential::run(&model, "Peru", &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn memory_keeps_every_turn() {
    let model = ScriptedModel::new()
        .when("My name is Alice", "Nice to meet you, Alice!")
        .otherwise("You are Alice from New York.");
    let mut out = Vec::new();

    let history = exercises::memory::run(&model, &mut out).await.unwrap();
    assert_eq!(history.len(), 8);
    assert_eq!(model.call_count(), 4);

    // The last turn sees all three earlier exchanges.
    let requests = model.requests();
    let system = requests[3].messages[0].content.as_deref().unwrap();
    assert!(system.contains("User: My name is Alice and I'm from New York."));
    assert!(system.contains("AI: Nice to meet you, Alice!"));
    assert!(system.contains("User: Tell me about my city."));
    assert!(!system.contains("Can you remind me"));

    let text = printed(out);
    assert!(text.starts_with("Conversational Memory Demonstration:\n"));
    for input in USER_MESSAGES {
        assert!(text.contains(&format!("User: {input}\n")));
    }
    assert!(text.contains("\nCurrent Conversation History:\n"));
}

#[tokio::test]
async fn summary_rewrites_after_each_turn() {
    let mut model = ScriptedModel::new();
    for turn in 1..=4 {
        model = model
            .then(Reply::Text(format!("reply {turn}")))
            .then(Reply::Text(format!("summary after turn {turn}")));
    }
    let mut out = Vec::new();

    let memory = exercises::summary::run(&model, &mut out).await.unwrap();
    assert_eq!(model.call_count(), 8);
    assert_eq!(memory.updates(), 4);
    assert_eq!(memory.render(), "summary after turn 4");

    let requests = model.requests();
    // Conversation turns carry the previous summary, not raw history.
    let system = requests[2].messages[0].content.as_deref().unwrap();
    assert!(system.ends_with("summary after turn 1"));
    assert!(!system.contains("User: My name is Alice"));
    // Summary calls carry the latest exchange.
    let update = requests[3].last_user_content().unwrap();
    assert!(update.contains("User: What do you know about me?\nAI: reply 2"));

    let text = printed(out);
    assert!(text.contains(&"-".repeat(40)));
    assert!(text.trim_end().ends_with("summary after turn 4"));
}

#[tokio::test]
async fn tools_evaluates_directly_then_through_agent() {
    let mut model = ScriptedModel::new();
    for (i, (expr, answer)) in [
        ("pi * 5^2", "About 78.54 square units."),
        ("2^8 + sqrt(81)", "265"),
        ("45% * 890 + 10!", "3629200.5"),
        ("3^4 - 15", "66 apples remain."),
    ]
    .into_iter()
    .enumerate()
    {
        model = model
            .then(Reply::ToolCalls(vec![calc(&format!("call_{i}"), expr)]))
            .then(Reply::Text(answer.into()));
    }
    let mut out = Vec::new();

    let report = exercises::tools::run(&model, &NoopHandler, &mut out)
        .await
        .unwrap();
    let direct: Vec<_> = report.direct.iter().map(|(_, r)| r.as_str()).collect();
    assert_eq!(direct, ["4", "12", "1", "0.43429448190325", "54"]);

    assert_eq!(report.answers.len(), 4);
    assert!(report.answers.iter().all(|a| a.finished && a.tool_calls == 1));
    assert_eq!(report.answers[3].output, "66 apples remain.");

    // Each tool result goes back to the model before its final answer.
    let requests = model.requests();
    assert_eq!(requests.len(), 8);
    let tool_result = |i: usize| {
        requests[i]
            .messages
            .iter()
            .find(|m| m.role == ApiRole::Tool)
            .and_then(|m| m.content.clone())
    };
    assert_eq!(tool_result(1).as_deref(), Some("78.539816339745"));
    assert_eq!(tool_result(3).as_deref(), Some("265"));
    assert_eq!(tool_result(5).as_deref(), Some("3629200.5"));
    assert_eq!(tool_result(7).as_deref(), Some("66"));

    let text = printed(out);
    assert!(text.starts_with("=== Direct Tool Evaluation ===\n"));
    assert!(text.contains("2 + 2                => 4\n"));
    assert!(text.contains("\n=== Agent-based Evaluation ===\n"));
    assert!(text.contains(
        "Q: If I have 3^4 apples and eat 15, how many remain?\nA: 66 apples remain.\n"
    ));
    assert!(text.ends_with("Total tokens used: 0\n"));
}

#[tokio::test]
async fn tools_reports_tool_events_through_composed_handlers() {
    let mut model = ScriptedModel::new();
    for (i, expr) in ["pi * 5^2", "2^8 + sqrt(81)", "45% * 890 + 10!", "3^4 - 15"]
        .into_iter()
        .enumerate()
    {
        model = model
            .then(Reply::ToolCalls(vec![calc(&format!("call_{i}"), expr)]))
            .then(Reply::Text("done".into()));
    }
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let events = CompositeEventHandler::new()
        .with(FnEventHandler::new(move |event: &AgentEvent<'_>| {
            if let AgentEvent::ToolResult { result, .. } = event {
                sink.lock().unwrap().push(result.to_string());
            }
        }))
        .with_if(
            false,
            FnEventHandler::new(|_: &AgentEvent<'_>| panic!("disabled handler ran")),
        );
    let mut out = Vec::new();

    let report = exercises::tools::run(&model, &events, &mut out)
        .await
        .unwrap();
    assert_eq!(report.total_tokens(), 0);
    assert_eq!(
        *seen.lock().unwrap(),
        ["78.539816339745", "265", "3629200.5", "66"]
    );
}
