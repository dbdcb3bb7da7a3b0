use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{bson::doc, bson::oid::ObjectId, Client, Collection, IndexModel};

use crate::dbs::mongo::models::MongoUser;
use crate::error::{PersistError, Result};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// Unique index on `email`
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Insert a user, mapping a duplicate key error to `DuplicateEmail`
    pub async fn create_user(&self, user: MongoUser) -> Result<MongoUser> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(PersistError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, user_id: ObjectId) -> Result<Option<MongoUser>> {
        let filter = doc! { "_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<MongoUser>> {
        let filter = doc! { "email": email };
        Ok(self.collection.find_one(filter).await?)
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
