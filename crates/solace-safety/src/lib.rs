//! Safety classification for incoming chat text.
//!
//! Two independent passes run over the same normalized text:
//! - [`CrisisDetector`]: static phrase lists compiled to word-boundary regexes
//! - [`SentimentAnalyzer`]: a small lexicon with negation and intensifiers
//!
//! [`SafetyClassifier`] combines both into a [`SafetyVerdict`].

mod normalize;
pub mod crisis;
pub mod sentiment;
pub mod classifier;

pub use normalize::normalize;
pub use crisis::{CrisisDetector, CrisisPatterns, DEFAULT_CRISIS_RESOURCES};
pub use sentiment::SentimentAnalyzer;
pub use classifier::{SafetyClassifier, SafetyConfig};

pub use solace_types::{CrisisFlags, CrisisLevel, SafetyVerdict, Sentiment};
