use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use solace_types::{CrisisFlags, Sender, Sentiment};

use crate::models::{ChatSession, StoredMessage, User};

/// Parse a stored id, or mint a new one for ids created outside MongoDB
fn object_id_or_new(id: &str) -> ObjectId {
    ObjectId::parse_str(id).unwrap_or_else(|_| ObjectId::new())
}

/// MongoDB-specific User model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub age: u32,
    pub terms_accepted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// MongoDB-specific Session model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSession {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(default)]
    pub message_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_crisis_at: Option<DateTime>,
}

/// MongoDB-specific Message model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub session_id: ObjectId,
    pub user_id: String,
    pub sender: Sender,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub crisis: CrisisFlags,
    #[serde(default)]
    pub fallback: bool,
    pub created_at: DateTime,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<User> for MongoUser {
    fn from(user: User) -> Self {
        Self {
            id: object_id_or_new(&user.id),
            email: user.email,
            password_hash: user.password_hash,
            password_salt: user.password_salt,
            age: user.age,
            terms_accepted: user.terms_accepted,
            created_at: DateTime::from_chrono(user.created_at),
            updated_at: DateTime::from_chrono(user.updated_at),
        }
    }
}

impl From<MongoUser> for User {
    fn from(user: MongoUser) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email,
            password_hash: user.password_hash,
            password_salt: user.password_salt,
            age: user.age,
            terms_accepted: user.terms_accepted,
            created_at: user.created_at.to_chrono(),
            updated_at: user.updated_at.to_chrono(),
        }
    }
}

impl From<ChatSession> for MongoSession {
    fn from(session: ChatSession) -> Self {
        Self {
            id: object_id_or_new(&session.id),
            user_id: session.user_id,
            title: session.title,
            created_at: DateTime::from_chrono(session.created_at),
            updated_at: DateTime::from_chrono(session.updated_at),
            message_count: i64::try_from(session.message_count).unwrap_or(i64::MAX),
            last_crisis_at: session.last_crisis_at.map(DateTime::from_chrono),
        }
    }
}

impl From<MongoSession> for ChatSession {
    fn from(session: MongoSession) -> Self {
        Self {
            id: session.id.to_hex(),
            user_id: session.user_id,
            title: session.title,
            created_at: session.created_at.to_chrono(),
            updated_at: session.updated_at.to_chrono(),
            message_count: session.message_count.max(0) as u64,
            last_crisis_at: session.last_crisis_at.map(|t| t.to_chrono()),
        }
    }
}

impl From<StoredMessage> for MongoMessage {
    fn from(msg: StoredMessage) -> Self {
        Self {
            id: object_id_or_new(&msg.id),
            session_id: object_id_or_new(&msg.session_id),
            user_id: msg.user_id,
            sender: msg.sender,
            content: msg.content,
            sentiment: msg.sentiment,
            sentiment_score: msg.sentiment_score.map(f64::from),
            crisis: msg.crisis,
            fallback: msg.fallback,
            created_at: DateTime::from_chrono(msg.created_at),
        }
    }
}

impl From<MongoMessage> for StoredMessage {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id.to_hex(),
            session_id: msg.session_id.to_hex(),
            user_id: msg.user_id,
            sender: msg.sender,
            content: msg.content,
            sentiment: msg.sentiment,
            sentiment_score: msg.sentiment_score.map(|s| s as f32),
            crisis: msg.crisis,
            fallback: msg.fallback,
            created_at: msg.created_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_types::SafetyVerdict;

    #[test]
    fn test_foreign_ids_are_replaced() {
        let user = User::new("a@b.co", "h", "s", 20, true);
        let mongo: MongoUser = user.into();
        let back: User = mongo.clone().into();
        assert_eq!(back.id, mongo.id.to_hex());
        assert_eq!(back.email, "a@b.co");
    }

    #[test]
    fn test_message_keeps_session_object_id() {
        let session_id = ObjectId::new();
        let msg = StoredMessage::from_user(
            session_id.to_hex(),
            "u1",
            "hello",
            &SafetyVerdict::neutral(),
        );
        let mongo: MongoMessage = msg.into();
        assert_eq!(mongo.session_id, session_id);
        assert_eq!(mongo.sentiment, Some(Sentiment::Neutral));

        let bson = mongodb::bson::to_document(&mongo).unwrap();
        assert!(bson.get_datetime("created_at").is_ok());
        assert!(bson.get_object_id("session_id").is_ok());
    }

    #[test]
    fn test_session_counts_round_trip() {
        let mut session = ChatSession::new("u1", Some("Evening".into()));
        session.message_count = 4;
        let back: ChatSession = MongoSession::from(session).into();
        assert_eq!(back.message_count, 4);
        assert_eq!(back.title.as_deref(), Some("Evening"));
        assert!(back.last_crisis_at.is_none());
    }
}
