pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use dbs::InMemoryPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::{PersistError, Result};
pub use models::{ChatSession, StoredMessage, User};
pub use trait_client::PersistenceClient;
