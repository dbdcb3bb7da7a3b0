use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, bson::DateTime, Client, Collection};

use crate::dbs::mongo::models::MongoSession;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoSessionRepository {
    collection: Collection<MongoSession>,
}

impl MongoSessionRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("sessions");
        Self { collection }
    }

    /// Create a new session
    pub async fn create_session(&self, session: MongoSession) -> Result<MongoSession> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    /// Get session by ID
    pub async fn get_session(&self, session_id: ObjectId) -> Result<Option<MongoSession>> {
        let filter = doc! { "_id": session_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// List sessions for a user
    pub async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<MongoSession>> {
        // the driver reads a zero limit as "no limit"
        if limit.is_some_and(|l| l <= 0) {
            return Ok(Vec::new());
        }
        let filter = doc! { "user_id": user_id };
        let mut find_opts = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1, "_id": -1 });

        if let Some(limit) = limit {
            find_opts = find_opts.limit(limit);
        }
        if let Some(skip) = skip {
            find_opts = find_opts.skip(skip.try_into().unwrap_or(0));
        }

        let sessions = find_opts.await?.try_collect().await?;
        Ok(sessions)
    }

    /// Bump activity counters. Returns false when the session does not exist.
    pub async fn touch_session(&self, session_id: ObjectId, crisis: bool) -> Result<bool> {
        let now = DateTime::now();
        let filter = doc! { "_id": session_id };
        let mut set = doc! { "updated_at": now };
        if crisis {
            set.insert("last_crisis_at", now);
        }
        let update = doc! {
            "$set": set,
            "$inc": { "message_count": 1_i64 }
        };

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count > 0)
    }

    /// Delete session owned by `user_id`
    pub async fn delete_session(&self, session_id: ObjectId, user_id: &str) -> Result<bool> {
        let filter = doc! { "_id": session_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}
