use solace_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Message is too long ({len} characters, maximum {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}
