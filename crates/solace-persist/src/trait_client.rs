use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatSession, StoredMessage, User};

/// Trait for database persistence operations
///
/// Implementations provide database-specific CRUD operations over users,
/// chat sessions and their messages.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Short backend name reported by health checks
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Insert a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: User) -> Result<User>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Lookup is case-insensitive
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a new session for a user
    async fn create_session(&self, user_id: &str, title: Option<String>) -> Result<ChatSession>;

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// List sessions for a user, most recently updated first
    async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<ChatSession>>;

    /// Record activity on a session: bumps `updated_at` and `message_count`,
    /// and stamps `last_crisis_at` when `crisis` is set
    async fn touch_session(&self, session_id: &str, crisis: bool) -> Result<()>;

    /// Delete a session owned by `user_id` together with its messages.
    /// Returns false when no such session exists for that user.
    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<bool>;

    /// Save a single message, returning it as stored
    async fn save_message(&self, message: StoredMessage) -> Result<StoredMessage>;

    /// Messages of a session in chronological order.
    ///
    /// With `before`, only messages older than that message id are
    /// considered; `limit` keeps the newest of them.
    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
        before: Option<&str>,
    ) -> Result<Vec<StoredMessage>>;

    async fn count_messages(&self, session_id: &str) -> Result<u64>;
}
