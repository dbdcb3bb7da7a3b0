mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

pub use memory::InMemoryPersistenceClient;
