use async_trait::async_trait;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Database};

use crate::dbs::mongo::models::{MongoMessage, MongoSession, MongoUser};
use crate::dbs::mongo::repositories::{
    MongoMessageRepository, MongoSessionRepository, MongoUserRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{ChatSession, StoredMessage, User};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    database: Database,
    user_repo: MongoUserRepository,
    session_repo: MongoSessionRepository,
    message_repo: MongoMessageRepository,
}

fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(e.to_string()))
}

impl MongoPersistenceClient {
    /// Connect to MongoDB, create client and make sure indexes exist
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let this = Self {
            database: client.database(database),
            user_repo: MongoUserRepository::new(&client, database),
            session_repo: MongoSessionRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
        };

        this.user_repo.ensure_indexes().await?;
        this.message_repo.ensure_indexes().await?;
        tracing::info!(database, "MongoDB persistence ready");

        Ok(this)
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn create_user(&self, user: User) -> Result<User> {
        let mut mongo_user: MongoUser = user.into();
        mongo_user.email = User::normalize_email(&mongo_user.email);
        let created = self.user_repo.create_user(mongo_user).await?;
        Ok(created.into())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let object_id = parse_id(user_id)?;
        let mongo_user = self.user_repo.get_user(object_id).await?;
        Ok(mongo_user.map(|u| u.into()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = User::normalize_email(email);
        let mongo_user = self.user_repo.find_by_email(&email).await?;
        Ok(mongo_user.map(|u| u.into()))
    }

    async fn create_session(&self, user_id: &str, title: Option<String>) -> Result<ChatSession> {
        let session: MongoSession = ChatSession::new(user_id, title).into();
        let created = self.session_repo.create_session(session).await?;
        Ok(created.into())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let object_id = parse_id(session_id)?;
        let mongo_session = self.session_repo.get_session(object_id).await?;
        Ok(mongo_session.map(|s| s.into()))
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<ChatSession>> {
        let mongo_sessions = self.session_repo.list_sessions(user_id, limit, skip).await?;
        let sessions = mongo_sessions.into_iter().map(|s| s.into()).collect();
        Ok(sessions)
    }

    async fn touch_session(&self, session_id: &str, crisis: bool) -> Result<()> {
        let object_id = parse_id(session_id)?;
        if !self.session_repo.touch_session(object_id, crisis).await? {
            return Err(PersistError::not_found("Session", session_id));
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<bool> {
        let object_id = parse_id(session_id)?;
        if !self.session_repo.delete_session(object_id, user_id).await? {
            return Ok(false);
        }
        let removed = self.message_repo.delete_for_session(object_id).await?;
        tracing::debug!(session_id, removed, "Deleted session messages");
        Ok(true)
    }

    async fn save_message(&self, message: StoredMessage) -> Result<StoredMessage> {
        parse_id(&message.session_id)?;
        let mongo_message: MongoMessage = message.into();
        let saved = self.message_repo.save_message(mongo_message).await?;
        Ok(saved.into())
    }

    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
        before: Option<&str>,
    ) -> Result<Vec<StoredMessage>> {
        let object_id = parse_id(session_id)?;
        let before = before.map(parse_id).transpose()?;

        let mongo_messages = self
            .message_repo
            .get_messages(object_id, limit, before)
            .await?;
        let messages = mongo_messages.into_iter().map(|m| m.into()).collect();
        Ok(messages)
    }

    async fn count_messages(&self, session_id: &str) -> Result<u64> {
        let object_id = parse_id(session_id)?;
        self.message_repo.count_messages(object_id).await
    }
}
