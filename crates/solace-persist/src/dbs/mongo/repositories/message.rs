use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection, IndexModel};

use crate::dbs::mongo::models::MongoMessage;
use crate::error::{PersistError, Result};

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("messages");
        Self { collection }
    }

    /// History lookups filter by session and sort by time
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "created_at": 1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Save a single message
    pub async fn save_message(&self, message: MongoMessage) -> Result<MongoMessage> {
        self.collection.insert_one(&message).await?;
        Ok(message)
    }

    /// Messages for a session in chronological order.
    ///
    /// The newest `limit` messages strictly older than `before` are fetched
    /// in descending order and reversed.
    pub async fn get_messages(
        &self,
        session_id: ObjectId,
        limit: Option<i64>,
        before: Option<ObjectId>,
    ) -> Result<Vec<MongoMessage>> {
        // the driver reads a zero limit as "no limit", a negative one as a single batch
        if limit.is_some_and(|l| l <= 0) {
            return Ok(Vec::new());
        }
        let mut filter = doc! { "session_id": session_id };

        if let Some(cursor_id) = before {
            let cursor = self
                .collection
                .find_one(doc! { "_id": cursor_id, "session_id": session_id })
                .await?
                .ok_or_else(|| PersistError::not_found("Message", cursor_id.to_hex()))?;

            filter.insert(
                "$or",
                vec![
                    doc! { "created_at": { "$lt": cursor.created_at } },
                    doc! { "created_at": cursor.created_at, "_id": { "$lt": cursor_id } },
                ],
            );
        }

        let mut find_opts = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 });
        if let Some(limit) = limit {
            find_opts = find_opts.limit(limit);
        }

        let mut messages: Vec<MongoMessage> = find_opts.await?.try_collect().await?;
        messages.reverse();
        Ok(messages)
    }

    pub async fn count_messages(&self, session_id: ObjectId) -> Result<u64> {
        let filter = doc! { "session_id": session_id };
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn delete_for_session(&self, session_id: ObjectId) -> Result<u64> {
        let filter = doc! { "session_id": session_id };
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
