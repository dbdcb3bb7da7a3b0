use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_types::{CrisisFlags, SafetyVerdict, Sender, Sentiment};

/// Database-agnostic message model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub sender: Sender,
    pub content: String,
    /// Only user messages are classified
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: Option<f32>,
    pub crisis: CrisisFlags,
    /// AI message produced from canned text instead of the provider
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// A user message carrying its safety verdict
    pub fn from_user(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
        verdict: &SafetyVerdict,
    ) -> Self {
        Self {
            id: super::new_id(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            sender: Sender::User,
            content: content.into(),
            sentiment: Some(verdict.sentiment),
            sentiment_score: Some(verdict.score),
            crisis: verdict.crisis.clone(),
            fallback: false,
            created_at: Utc::now(),
        }
    }

    /// An AI reply in the given session
    pub fn from_ai(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
        fallback: bool,
    ) -> Self {
        Self {
            id: super::new_id(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            sender: Sender::Ai,
            content: content.into(),
            sentiment: None,
            sentiment_score: None,
            crisis: CrisisFlags::none(),
            fallback,
            created_at: Utc::now(),
        }
    }
}

// Conversion: StoredMessage → solace_llm::Message
impl From<&StoredMessage> for solace_llm::Message {
    fn from(msg: &StoredMessage) -> Self {
        match msg.sender {
            Sender::User => solace_llm::Message::human(msg.content.as_str()),
            Sender::Ai => solace_llm::Message::ai(msg.content.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_types::CrisisLevel;

    #[test]
    fn test_user_message_carries_verdict() {
        let verdict = SafetyVerdict {
            sentiment: Sentiment::Negative,
            score: -0.71,
            crisis: CrisisFlags::new(CrisisLevel::Elevated, vec!["hopeless".into()]),
        };
        let msg = StoredMessage::from_user("s1", "u1", "I feel hopeless", &verdict);

        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.sentiment, Some(Sentiment::Negative));
        assert_eq!(msg.sentiment_score, Some(-0.71));
        assert!(msg.crisis.detected);
        assert!(!msg.fallback);
    }

    #[test]
    fn test_ai_message_has_no_sentiment() {
        let msg = StoredMessage::from_ai("s1", "u1", "I'm here for you.", true);
        assert_eq!(msg.sender, Sender::Ai);
        assert!(msg.sentiment.is_none());
        assert!(msg.fallback);
        assert!(!msg.crisis.detected);
    }

    #[test]
    fn test_into_llm_message() {
        let verdict = SafetyVerdict::neutral();
        let user = StoredMessage::from_user("s1", "u1", "hello", &verdict);
        let ai = StoredMessage::from_ai("s1", "u1", "hi there", false);

        assert_eq!(solace_llm::Message::from(&user), solace_llm::Message::human("hello"));
        assert_eq!(solace_llm::Message::from(&ai), solace_llm::Message::ai("hi there"));
    }
}
