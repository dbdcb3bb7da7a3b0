use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solace_chat::{
    page_size, ChatConfig, ChatError, ChatEvent, ChatService, EventHub, SendMessage, DEFAULT_PAGE,
    MAX_PAGE,
};
use solace_llm::{ChatClient, ChatRequest, ChatResponse, LLMClient};
use solace_persist::{InMemoryPersistenceClient, PersistenceClient};
use solace_types::{CrisisLevel, Sender, Sentiment};

enum Step {
    Reply(&'static str),
    Fail,
    Hang,
}

/// LLM client that answers from a script and records every request
struct ScriptedClient {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(ChatResponse {
                content: Some(text.to_string()),
                usage: None,
                finish_reason: Some("stop".to_string()),
                raw: serde_json::Value::Null,
            }),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(anyhow!("unreachable"))
            }
            Some(Step::Fail) | None => Err(anyhow!("provider unavailable")),
        }
    }
}

impl LLMClient for ScriptedClient {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

struct Fixture {
    service: ChatService,
    client: Arc<ScriptedClient>,
    store: Arc<InMemoryPersistenceClient>,
    hub: Arc<EventHub>,
}

fn fixture(steps: Vec<Step>, config: ChatConfig) -> Fixture {
    let client = ScriptedClient::new(steps);
    let store = Arc::new(InMemoryPersistenceClient::new());
    let hub = Arc::new(EventHub::new());
    let service = ChatService::builder()
        .llm_client(client.clone())
        .persistence(store.clone())
        .hub(hub.clone())
        .config(config)
        .build()
        .unwrap();
    Fixture {
        service,
        client,
        store,
        hub,
    }
}

fn message(session_id: Option<&str>, content: &str) -> SendMessage {
    SendMessage {
        user_id: "u1".to_string(),
        session_id: session_id.map(str::to_string),
        content: content.to_string(),
    }
}

#[tokio::test]
async fn test_new_session_reply_and_events() {
    let f = fixture(vec![Step::Reply("That sounds lovely.")], ChatConfig::default());
    let mut events = f.hub.subscribe("u1");

    let outcome = f
        .service
        .send_message(message(None, "I had a great walk in the park today"))
        .await
        .unwrap();

    assert_eq!(outcome.reply, "That sounds lovely.");
    assert!(!outcome.fallback);
    assert_eq!(outcome.verdict.sentiment, Sentiment::Positive);
    assert!(outcome.crisis_resources.is_none());

    let session = f.store.get_session(&outcome.session_id).await.unwrap().unwrap();
    assert_eq!(session.title.as_deref(), Some("I had a great walk in the park today"));
    assert_eq!(session.message_count, 2);

    let stored = f.store.get_messages(&outcome.session_id, None, None).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, outcome.user_message_id);
    assert_eq!(stored[0].sentiment, Some(Sentiment::Positive));
    assert_eq!(stored[1].id, outcome.reply_message_id);
    assert_eq!(stored[1].sender, Sender::Ai);

    assert!(matches!(events.recv().await.unwrap(), ChatEvent::SessionCreated { .. }));
    assert!(matches!(events.recv().await.unwrap(), ChatEvent::MessageReceived { .. }));
    match events.recv().await.unwrap() {
        ChatEvent::Reply { content, fallback, .. } => {
            assert_eq!(content, "That sounds lovely.");
            assert!(!fallback);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_prompt_carries_system_prompt_and_history() {
    let config = ChatConfig::new("gemini-1.5-flash")
        .with_system_prompt("Be kind.")
        .with_temperature(0.4)
        .with_history_limit(2);
    let f = fixture(
        vec![Step::Reply("first"), Step::Reply("second"), Step::Reply("third")],
        config,
    );

    let first = f.service.send_message(message(None, "one")).await.unwrap();
    let sid = Some(first.session_id.as_str());
    f.service.send_message(message(sid, "two")).await.unwrap();
    f.service.send_message(message(sid, "three")).await.unwrap();

    let requests = f.client.requests();
    assert_eq!(requests.len(), 3);

    let last = &requests[2];
    assert_eq!(last.model, "gemini-1.5-flash");
    assert_eq!(last.options.temperature, Some(0.4));
    let texts: Vec<String> = last.messages.iter().map(|m| m.text().to_string()).collect();
    // system prompt + last two stored messages + the new one
    assert_eq!(texts, vec!["Be kind.", "two", "second", "three"]);
    assert_eq!(last.messages[0].role(), "system");
    assert_eq!(last.messages[2].role(), "assistant");
}

#[tokio::test]
async fn test_history_window_opens_with_user_turn() {
    let config = ChatConfig::new("gemini-1.5-flash")
        .with_system_prompt("Be kind.")
        .with_history_limit(3);
    let f = fixture(
        vec![Step::Reply("first"), Step::Reply("second"), Step::Reply("third")],
        config,
    );

    let first = f.service.send_message(message(None, "one")).await.unwrap();
    let sid = Some(first.session_id.as_str());
    f.service.send_message(message(sid, "two")).await.unwrap();
    f.service.send_message(message(sid, "three")).await.unwrap();

    // the window [first, two, second] loses its leading assistant turn
    let last = &f.client.requests()[2];
    let texts: Vec<String> = last.messages.iter().map(|m| m.text().to_string()).collect();
    assert_eq!(texts, vec!["Be kind.", "two", "second", "three"]);
    let roles: Vec<&str> = last.messages.iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
}

#[tokio::test]
async fn test_zero_history_limit_sends_no_history() {
    let config = ChatConfig::new("gemini-1.5-flash")
        .with_system_prompt("Be kind.")
        .with_history_limit(0);
    let f = fixture(vec![Step::Reply("first"), Step::Reply("second")], config);

    let first = f.service.send_message(message(None, "one")).await.unwrap();
    f.service
        .send_message(message(Some(&first.session_id), "two"))
        .await
        .unwrap();

    let last = &f.client.requests()[1];
    let texts: Vec<String> = last.messages.iter().map(|m| m.text().to_string()).collect();
    assert_eq!(texts, vec!["Be kind.", "two"]);
}

#[tokio::test]
async fn test_provider_failure_uses_fallback() {
    let f = fixture(vec![Step::Fail], ChatConfig::default());

    let outcome = f
        .service
        .send_message(message(None, "I'm so stressed and tired"))
        .await
        .unwrap();

    assert!(outcome.fallback);
    assert!(!outcome.reply.is_empty());
    let stored = f.store.get_messages(&outcome.session_id, None, None).await.unwrap();
    assert!(stored[1].fallback);
}

#[tokio::test]
async fn test_provider_timeout_uses_fallback() {
    let config = ChatConfig::default().with_provider_timeout(Duration::from_secs(1));
    let f = fixture(vec![Step::Hang], config);

    let outcome = f.service.send_message(message(None, "hello")).await.unwrap();
    assert!(outcome.fallback);
}

#[tokio::test]
async fn test_empty_provider_reply_uses_fallback() {
    let f = fixture(vec![Step::Reply("   ")], ChatConfig::default());
    let outcome = f.service.send_message(message(None, "hello")).await.unwrap();
    assert!(outcome.fallback);
}

#[tokio::test]
async fn test_critical_crisis_skips_provider() {
    let f = fixture(vec![Step::Reply("should not be used")], ChatConfig::default());
    let mut events = f.hub.subscribe("u1");

    let outcome = f
        .service
        .send_message(message(None, "I want to kill myself"))
        .await
        .unwrap();

    assert!(f.client.requests().is_empty());
    assert!(!outcome.fallback);
    assert_eq!(outcome.verdict.crisis.level, CrisisLevel::Critical);
    assert_eq!(outcome.verdict.sentiment, Sentiment::Negative);
    let resources = outcome.crisis_resources.clone().unwrap();
    assert!(outcome.reply.ends_with(&resources));

    let session = f.store.get_session(&outcome.session_id).await.unwrap().unwrap();
    assert!(session.last_crisis_at.is_some());

    let mut saw_alert = false;
    while let Ok(event) = events.try_recv() {
        if let ChatEvent::CrisisAlert { level, .. } = event {
            assert_eq!(level, CrisisLevel::Critical);
            saw_alert = true;
        }
    }
    assert!(saw_alert);
}

#[tokio::test]
async fn test_elevated_crisis_appends_resources() {
    let f = fixture(vec![Step::Reply("I hear you.")], ChatConfig::default());

    let outcome = f
        .service
        .send_message(message(None, "Everything feels hopeless"))
        .await
        .unwrap();

    assert_eq!(f.client.requests().len(), 1);
    assert_eq!(outcome.verdict.crisis.level, CrisisLevel::Elevated);
    let resources = outcome.crisis_resources.unwrap();
    assert!(outcome.reply.starts_with("I hear you."));
    assert!(outcome.reply.ends_with(&resources));
}

#[tokio::test]
async fn test_message_validation() {
    let f = fixture(vec![], ChatConfig::default());

    let err = f.service.send_message(message(None, "  \n ")).await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyMessage));

    let long = "a".repeat(4001);
    let err = f.service.send_message(message(None, &long)).await.unwrap_err();
    assert!(matches!(err, ChatError::MessageTooLong { len: 4001, max: 4000 }));

    assert!(f.store.list_sessions("u1", None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_foreign_or_unknown_session_is_rejected() {
    let f = fixture(vec![Step::Reply("ok")], ChatConfig::default());
    let theirs = f.store.create_session("u2", None).await.unwrap();

    let err = f
        .service
        .send_message(message(Some(&theirs.id), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::SessionNotFound(_)));

    let err = f
        .service
        .send_message(message(Some("missing"), "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::SessionNotFound(_)));
    assert_eq!(f.store.count_messages(&theirs.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_long_message_title_is_truncated() {
    let f = fixture(vec![Step::Reply("ok")], ChatConfig::default());
    let text = "Today I want to talk about my sleep schedule and how it has been";

    let outcome = f.service.send_message(message(None, text)).await.unwrap();
    let session = f.store.get_session(&outcome.session_id).await.unwrap().unwrap();
    assert_eq!(session.title.as_deref(), Some("Today I want to talk about my sleep sche"));
}

#[tokio::test]
async fn test_history_sessions_and_delete() {
    let f = fixture(vec![Step::Reply("a"), Step::Reply("b")], ChatConfig::default());
    let outcome = f.service.send_message(message(None, "first")).await.unwrap();
    let sid = outcome.session_id.clone();
    f.service.send_message(message(Some(&sid), "second")).await.unwrap();

    let history = f.service.history("u1", &sid, None, None).await.unwrap();
    let texts: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(texts, vec!["first", "a", "second", "b"]);

    let page = f
        .service
        .history("u1", &sid, Some(2), Some(&history[2].id))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].content, "first");

    assert!(matches!(
        f.service.history("u2", &sid, None, None).await,
        Err(ChatError::SessionNotFound(_))
    ));

    let sessions = f.service.sessions("u1", None, None).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 4);

    assert!(matches!(
        f.service.delete_session("u2", &sid).await,
        Err(ChatError::SessionNotFound(_))
    ));
    f.service.delete_session("u1", &sid).await.unwrap();
    assert!(f.service.sessions("u1", None, None).await.unwrap().is_empty());
}

#[test]
fn test_builder_requires_clients() {
    let result = ChatService::builder()
        .persistence(Arc::new(InMemoryPersistenceClient::new()))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_page_size_is_clamped() {
    assert_eq!(page_size(None), DEFAULT_PAGE);
    assert_eq!(page_size(Some(10)), 10);
    assert_eq!(page_size(Some(1000)), MAX_PAGE);
    assert_eq!(page_size(Some(0)), 1);
    assert_eq!(page_size(Some(-5)), 1);
}
