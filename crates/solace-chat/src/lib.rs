//! Chat orchestration.
//!
//! [`ChatService`] ties the pieces together for every incoming message:
//! safety classification, the stored history window, the provider call with
//! canned fallback text, persistence and live [`EventHub`] notifications.

pub mod builder;
pub mod config;
pub mod error;
pub mod fallback;
pub mod hub;
pub mod service;

pub use builder::ChatServiceBuilder;
pub use config::{ChatConfig, DEFAULT_SYSTEM_PROMPT};
pub use error::ChatError;
pub use hub::EventHub;
pub use service::{page_size, ChatOutcome, ChatService, SendMessage, DEFAULT_PAGE, MAX_MESSAGE_CHARS, MAX_PAGE};

pub use solace_types::ChatEvent;
