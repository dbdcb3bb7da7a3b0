use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse sentiment label attached to user messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Neutral
    }
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of crisis language found in a message.
///
/// Variants are declared in ascending severity so `Ord` can pick the worst match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrisisLevel {
    None,
    Elevated,
    Critical,
}

impl Default for CrisisLevel {
    fn default() -> Self {
        CrisisLevel::None
    }
}

impl CrisisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Elevated => "elevated",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crisis flags stored alongside every message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisFlags {
    pub detected: bool,
    pub level: CrisisLevel,
    #[serde(default)]
    pub matched_terms: Vec<String>,
}

impl CrisisFlags {
    pub fn none() -> Self {
        Self::default()
    }

    /// Build flags from a level; `detected` always mirrors `level != None`
    pub fn new(level: CrisisLevel, matched_terms: Vec<String>) -> Self {
        Self {
            detected: level != CrisisLevel::None,
            level,
            matched_terms,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.level == CrisisLevel::Critical
    }
}

/// Result of classifying one piece of user text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub sentiment: Sentiment,
    /// Lexicon score in [-1.0, 1.0]
    pub score: f32,
    pub crisis: CrisisFlags,
}

impl SafetyVerdict {
    pub fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            crisis: CrisisFlags::none(),
        }
    }
}
