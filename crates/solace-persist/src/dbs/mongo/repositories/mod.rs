pub mod message;
pub mod session;
pub mod user;

pub use message::MongoMessageRepository;
pub use session::MongoSessionRepository;
pub use user::MongoUserRepository;
