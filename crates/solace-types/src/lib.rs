pub mod verdict;
pub mod events;

pub use verdict::{Sender, Sentiment, CrisisLevel, CrisisFlags, SafetyVerdict};
pub use events::ChatEvent;
