use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic chat session model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: u64,
    pub last_crisis_at: Option<DateTime<Utc>>,
}

impl ChatSession {
    pub fn new(user_id: impl Into<String>, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id: user_id.into(),
            title,
            created_at: now,
            updated_at: now,
            message_count: 0,
            last_crisis_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
