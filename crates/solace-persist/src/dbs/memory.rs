use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{ChatSession, StoredMessage, User};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Store {
    users: HashMap<String, User>,
    sessions: HashMap<String, ChatSession>,
    /// Per-session messages in insertion (chronological) order
    messages: HashMap<String, Vec<StoredMessage>>,
}

/// Process-local backend for tests and `storage.backend = "memory"`
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    store: RwLock<Store>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_len(value: Option<i64>) -> Option<usize> {
    value.map(|v| v.max(0) as usize)
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, mut user: User) -> Result<User> {
        user.email = User::normalize_email(&user.email);

        let mut store = self.store.write().await;
        if store.users.values().any(|u| u.email == user.email) {
            return Err(PersistError::DuplicateEmail(user.email));
        }
        store.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.store.read().await.users.get(user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = User::normalize_email(email);
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_session(&self, user_id: &str, title: Option<String>) -> Result<ChatSession> {
        let session = ChatSession::new(user_id, title);
        let mut store = self.store.write().await;
        store.sessions.insert(session.id.clone(), session.clone());
        store.messages.insert(session.id.clone(), Vec::new());
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        Ok(self.store.read().await.sessions.get(session_id).cloned())
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<ChatSession>> {
        let store = self.store.read().await;
        let mut sessions: Vec<ChatSession> = store
            .sessions
            .values()
            .filter(|s| s.is_owned_by(user_id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let skip = to_len(skip).unwrap_or(0);
        let limit = to_len(limit).unwrap_or(usize::MAX);
        Ok(sessions.into_iter().skip(skip).take(limit).collect())
    }

    async fn touch_session(&self, session_id: &str, crisis: bool) -> Result<()> {
        let mut store = self.store.write().await;
        let session = store
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| PersistError::not_found("Session", session_id))?;

        let now = Utc::now();
        session.updated_at = now;
        session.message_count += 1;
        if crisis {
            session.last_crisis_at = Some(now);
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        let owned = store
            .sessions
            .get(session_id)
            .is_some_and(|s| s.is_owned_by(user_id));
        if !owned {
            return Ok(false);
        }
        store.sessions.remove(session_id);
        store.messages.remove(session_id);
        Ok(true)
    }

    async fn save_message(&self, message: StoredMessage) -> Result<StoredMessage> {
        let mut store = self.store.write().await;
        let messages = store
            .messages
            .get_mut(&message.session_id)
            .ok_or_else(|| PersistError::not_found("Session", message.session_id.clone()))?;
        messages.push(message.clone());
        Ok(message)
    }

    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
        before: Option<&str>,
    ) -> Result<Vec<StoredMessage>> {
        let store = self.store.read().await;
        let Some(messages) = store.messages.get(session_id) else {
            return Ok(Vec::new());
        };

        let end = match before {
            Some(cursor) => messages
                .iter()
                .position(|m| m.id == cursor)
                .ok_or_else(|| PersistError::not_found("Message", cursor))?,
            None => messages.len(),
        };
        let start = match to_len(limit) {
            Some(limit) => end.saturating_sub(limit),
            None => 0,
        };

        Ok(messages[start..end].to_vec())
    }

    async fn count_messages(&self, session_id: &str) -> Result<u64> {
        let store = self.store.read().await;
        Ok(store
            .messages
            .get(session_id)
            .map(|m| m.len() as u64)
            .unwrap_or(0))
    }
}
