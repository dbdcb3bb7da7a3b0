mod message;
mod session;
mod user;

// Export database-agnostic models
pub use message::StoredMessage;
pub use session::ChatSession;
pub use user::User;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
