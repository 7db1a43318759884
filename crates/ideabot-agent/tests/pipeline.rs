// SPDX-FileCopyrightText: 2026 Ideabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the event pipeline with mock adapters and real stores.

use std::time::Duration;

use ideabot_core::{Category, ChatEvent, CommandOutput, RoutingConfig, StorageAdapter};
use ideabot_test_utils::{TestHarness, group_event};
use tokio_util::sync::CancellationToken;

const ISSUE_FALLBACK: &str = "🐛 I see you've mentioned an issue. Can you provide more details?";

#[tokio::test]
async fn issue_keyword_gets_ai_reply() {
    let harness = TestHarness::builder()
        .with_responses(vec!["Try running with RUST_BACKTRACE=1.".into()])
        .build()
        .await
        .unwrap();

    let event = ChatEvent {
        is_direct: Some(false),
        ..ChatEvent::text(42, 7, "alice", "I found a bug in the parser")
    };
    let reply = harness.send(event).await;
    assert_eq!(reply.as_deref(), Some("Try running with RUST_BACKTRACE=1."));

    let requests = harness.mock_provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "llama3");
    assert!(requests[0].prompt.contains("Message type: issue."));

    let sent = harness.mock_channel.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 42);
}

#[tokio::test]
async fn issue_keyword_falls_back_when_ai_is_down() {
    let harness = TestHarness::builder()
        .with_failing_provider()
        .build()
        .await
        .unwrap();

    let reply = harness.send_group_text("I found a bug in the parser").await;
    assert_eq!(reply.as_deref(), Some(ISSUE_FALLBACK));
}

#[tokio::test]
async fn every_event_is_audited_in_order_even_when_ignored() {
    let harness = TestHarness::builder().build().await.unwrap();

    assert!(harness.send_group_text("lunch at noon").await.is_none());
    harness.send_group_text("/status").await;
    harness.send_group_text("please add dark mode").await;

    let records = harness.storage.recent_messages(10).await.unwrap();
    let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["lunch at noon", "/status", "please add dark mode"]);
    assert_eq!(records[2].category, Category::FeatureRequest);
    assert_eq!(records[0].username, "alice");

    // Nothing was sent for the ignored message.
    assert_eq!(harness.mock_channel.sent_count().await, 2);
}

#[tokio::test]
async fn run_command_executes_and_clears_task() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .mock_executor
        .push_output(CommandOutput {
            output: "total 0\n".into(),
            success: true,
            exit_code: Some(0),
        })
        .await;

    let reply = harness.send_group_text("/run ls -la").await;
    assert_eq!(reply.as_deref(), Some("💻 Output:\ntotal 0\n"));
    assert_eq!(
        harness.mock_executor.calls().await,
        [("ls -la".to_string(), "alice".to_string())]
    );
    assert!(harness.tasks.load().await.unwrap().is_empty());
    assert!(harness.mock_provider.requests().await.is_empty());
}

#[tokio::test]
async fn run_command_error_is_relayed() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .mock_executor
        .push_error("command 'rm' is not permitted")
        .await;

    let reply = harness.send_group_text("/run rm -rf /").await;
    assert_eq!(
        reply.as_deref(),
        Some("❌ Error: command 'rm' is not permitted")
    );
}

#[tokio::test]
async fn status_and_unknown_commands() {
    let harness = TestHarness::builder().build().await.unwrap();
    assert_eq!(
        harness.send_group_text("/status").await.as_deref(),
        Some("🤖 Bot is running and tracking conversations.")
    );
    assert_eq!(
        harness.send_group_text("/deploy prod").await.as_deref(),
        Some("⚡ Command processed: /deploy")
    );
    assert_eq!(
        harness.send_group_text("/run").await.as_deref(),
        Some("⚡ Command processed: /run")
    );
}

#[tokio::test]
async fn set_model_directive_persists_and_applies() {
    let harness = TestHarness::builder()
        .with_responses(vec!["hello from mistral".into()])
        .build()
        .await
        .unwrap();

    let reply = harness.send_group_text("/ai ollama model set mistral").await;
    assert_eq!(reply.as_deref(), Some("✅ AI model set to mistral"));
    assert!(harness.mock_provider.requests().await.is_empty());

    let on_disk = std::fs::read_to_string(harness.data_dir().join("configs.json")).unwrap();
    let persisted: RoutingConfig = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(persisted.default_ai_model, "mistral");

    let reply = harness.send_group_text("/ai summarize the thread").await;
    assert_eq!(reply.as_deref(), Some("hello from mistral"));
    assert_eq!(harness.mock_provider.requests().await[0].model, "mistral");
}

#[tokio::test]
async fn set_model_survives_persist_failure() {
    let harness = TestHarness::builder().build().await.unwrap();
    let path = harness.data_dir().join("configs.json");
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("blocker"), b"x").unwrap();

    let reply = harness
        .send_group_text("/ai ollama model set phi3")
        .await
        .unwrap();
    assert!(reply.starts_with("✅ AI model set to phi3 (not persisted:"), "{reply}");
    assert_eq!(harness.routing.snapshot().await.default_ai_model, "phi3");
}

#[tokio::test]
async fn explicit_ai_error_is_shown_verbatim() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness
        .mock_provider
        .push_error("{\"error\":\"model 'ghost' not found\"}")
        .await;

    let reply = harness.send_group_text("/ai what is a monad?").await.unwrap();
    assert_eq!(
        reply,
        "[AI error] ollama response: {\"error\":\"model 'ghost' not found\"}"
    );
    assert!(harness.tasks.active().await.unwrap().is_empty());
}

#[tokio::test]
async fn custom_routing_prompt_is_used() {
    let harness = TestHarness::builder()
        .with_routing(RoutingConfig {
            default_ai_prompt: "Answer like a pirate.".into(),
            ..RoutingConfig::default()
        })
        .build()
        .await
        .unwrap();

    harness.send_group_text("hey @ideabglobe_bot").await;
    let prompt = &harness.mock_provider.requests().await[0].prompt;
    assert!(prompt.starts_with("Answer like a pirate. Message type: message."));
}

#[tokio::test]
async fn send_failures_do_not_stop_processing() {
    let harness = TestHarness::builder().build().await.unwrap();
    harness.mock_channel.fail_sends(true);

    let reply = harness.send_group_text("/status").await;
    assert!(reply.is_some());
    assert_eq!(harness.mock_channel.sent_count().await, 0);

    harness.mock_channel.fail_sends(false);
    harness.send_group_text("/status").await;
    assert_eq!(harness.mock_channel.sent_count().await, 1);
}

#[tokio::test]
async fn run_loop_processes_events_until_cancelled() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    let channel = harness.mock_channel.clone();
    channel.inject(group_event("/status")).await;
    channel.inject(group_event("/deploy")).await;

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        harness.agent.run(loop_cancel).await.unwrap();
        harness
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while channel.sent_count().await < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("events were not processed");

    cancel.cancel();
    harness = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop did not stop")
        .unwrap();

    assert!(channel.was_shut_down());
    assert_eq!(harness.storage.message_count().await.unwrap(), 2);
}

#[tokio::test]
async fn run_loop_stops_when_channel_closes() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    harness.mock_channel.inject(group_event("/status")).await;
    harness.mock_channel.close();

    tokio::time::timeout(
        Duration::from_secs(5),
        harness.agent.run(CancellationToken::new()),
    )
    .await
    .expect("loop did not stop")
    .unwrap();

    assert_eq!(harness.mock_channel.sent_count().await, 1);
    assert!(harness.mock_channel.was_shut_down());
}

#[tokio::test]
async fn transient_receive_errors_do_not_stop_the_loop() {
    let mut harness = TestHarness::builder().build().await.unwrap();
    harness
        .mock_channel
        .inject_receive_error("connection reset")
        .await;
    harness.mock_channel.inject(group_event("/status")).await;
    harness.mock_channel.close();

    tokio::time::timeout(
        Duration::from_secs(5),
        harness.agent.run(CancellationToken::new()),
    )
    .await
    .expect("loop did not stop")
    .unwrap();

    assert_eq!(harness.mock_channel.sent_count().await, 1);
    assert!(harness.mock_channel.was_shut_down());
}
