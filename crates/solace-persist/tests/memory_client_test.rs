use solace_persist::{
    InMemoryPersistenceClient, PersistError, PersistenceClient, StoredMessage, User,
};
use solace_types::{CrisisFlags, CrisisLevel, SafetyVerdict, Sender, Sentiment};

fn user(email: &str) -> User {
    User::new(email, "hash", "salt", 25, true)
}

async fn seed_messages(
    store: &InMemoryPersistenceClient,
    session_id: &str,
    count: usize,
) -> Vec<StoredMessage> {
    let mut saved = Vec::new();
    for i in 0..count {
        let msg = if i % 2 == 0 {
            StoredMessage::from_user(session_id, "u1", format!("m{i}"), &SafetyVerdict::neutral())
        } else {
            StoredMessage::from_ai(session_id, "u1", format!("m{i}"), false)
        };
        saved.push(store.save_message(msg).await.unwrap());
    }
    saved
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let store = InMemoryPersistenceClient::new();
    store.create_user(user("sam@example.com")).await.unwrap();

    let err = store.create_user(user("SAM@Example.com")).await.unwrap_err();
    assert!(matches!(err, PersistError::DuplicateEmail(email) if email == "sam@example.com"));

    let found = store.find_user_by_email(" Sam@EXAMPLE.com").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_get_user_by_id() {
    let store = InMemoryPersistenceClient::new();
    let created = store.create_user(user("kim@example.com")).await.unwrap();

    let fetched = store.get_user(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, "kim@example.com");
    assert!(store.get_user("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sessions_listed_most_recent_first() {
    let store = InMemoryPersistenceClient::new();
    let first = store.create_session("u1", Some("first".into())).await.unwrap();
    let second = store.create_session("u1", Some("second".into())).await.unwrap();
    store.create_session("u2", None).await.unwrap();

    store.touch_session(&first.id, false).await.unwrap();

    let sessions = store.list_sessions("u1", None, None).await.unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);

    let page = store.list_sessions("u1", Some(1), Some(1)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second.id);
}

#[tokio::test]
async fn test_touch_session_counts_and_crisis() {
    let store = InMemoryPersistenceClient::new();
    let session = store.create_session("u1", None).await.unwrap();

    store.touch_session(&session.id, false).await.unwrap();
    store.touch_session(&session.id, true).await.unwrap();

    let session = store.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(session.message_count, 2);
    assert!(session.last_crisis_at.is_some());

    let err = store.touch_session("missing", false).await.unwrap_err();
    assert!(matches!(err, PersistError::NotFound { .. }));
}

#[tokio::test]
async fn test_messages_keep_verdicts() {
    let store = InMemoryPersistenceClient::new();
    let session = store.create_session("u1", None).await.unwrap();
    let verdict = SafetyVerdict {
        sentiment: Sentiment::Negative,
        score: -0.8,
        crisis: CrisisFlags::new(CrisisLevel::Critical, vec!["want to die".into()]),
    };

    store
        .save_message(StoredMessage::from_user(&session.id, "u1", "I want to die", &verdict))
        .await
        .unwrap();
    store
        .save_message(StoredMessage::from_ai(&session.id, "u1", "I'm here.", false))
        .await
        .unwrap();

    let messages = store.get_messages(&session.id, None, None).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert!(messages[0].crisis.is_critical());
    assert_eq!(messages[1].sender, Sender::Ai);
    assert_eq!(store.count_messages(&session.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_history_limit_and_cursor() {
    let store = InMemoryPersistenceClient::new();
    let session = store.create_session("u1", None).await.unwrap();
    let saved = seed_messages(&store, &session.id, 6).await;

    let latest = store.get_messages(&session.id, Some(2), None).await.unwrap();
    let contents: Vec<&str> = latest.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m4", "m5"]);

    let older = store
        .get_messages(&session.id, Some(3), Some(&saved[4].id))
        .await
        .unwrap();
    let contents: Vec<&str> = older.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m1", "m2", "m3"]);

    let oldest = store
        .get_messages(&session.id, Some(10), Some(&saved[0].id))
        .await
        .unwrap();
    assert!(oldest.is_empty());

    let err = store
        .get_messages(&session.id, None, Some("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::NotFound { entity: "Message", .. }));
}

#[tokio::test]
async fn test_save_message_requires_session() {
    let store = InMemoryPersistenceClient::new();
    let msg = StoredMessage::from_ai("missing", "u1", "hi", false);
    assert!(store.save_message(msg).await.is_err());
}

#[tokio::test]
async fn test_delete_session_checks_owner_and_removes_messages() {
    let store = InMemoryPersistenceClient::new();
    let session = store.create_session("u1", None).await.unwrap();
    seed_messages(&store, &session.id, 2).await;

    assert!(!store.delete_session(&session.id, "u2").await.unwrap());
    assert!(store.get_session(&session.id).await.unwrap().is_some());

    assert!(store.delete_session(&session.id, "u1").await.unwrap());
    assert!(store.get_session(&session.id).await.unwrap().is_none());
    assert_eq!(store.count_messages(&session.id).await.unwrap(), 0);
    assert!(!store.delete_session(&session.id, "u1").await.unwrap());
}

#[tokio::test]
async fn test_ping_and_backend_name() {
    let store = InMemoryPersistenceClient::new();
    store.ping().await.unwrap();
    assert_eq!(store.backend_name(), "memory");
}
