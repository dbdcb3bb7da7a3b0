use serde::{Deserialize, Serialize};

use crate::verdict::{CrisisLevel, SafetyVerdict};

/// Events pushed to a user's live channel (WebSocket)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A new session was opened implicitly by the first message
    SessionCreated {
        session_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// User message stored and classified
    MessageReceived {
        session_id: String,
        message_id: String,
        content: String,
        verdict: SafetyVerdict,
    },

    /// AI reply stored
    Reply {
        session_id: String,
        message_id: String,
        content: String,
        fallback: bool,
    },

    /// Crisis language was detected in the user's message
    CrisisAlert {
        session_id: String,
        level: CrisisLevel,
        resources: String,
    },

    /// Processing failed for a socket-originated request
    Error {
        message: String,
    },
}

impl ChatEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Session the event belongs to, if any
    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::SessionCreated { session_id, .. }
            | Self::MessageReceived { session_id, .. }
            | Self::Reply { session_id, .. }
            | Self::CrisisAlert { session_id, .. } => Some(session_id),
            Self::Error { .. } => None,
        }
    }
}
