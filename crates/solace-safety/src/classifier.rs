use serde::{Deserialize, Serialize};
use solace_types::{SafetyVerdict, Sentiment};

use crate::crisis::{CrisisDetector, DEFAULT_CRISIS_RESOURCES};
use crate::normalize::normalize;
use crate::sentiment::SentimentAnalyzer;

/// Upper bound applied to the sentiment score when crisis language is present
const CRISIS_SCORE_CEILING: f32 = -0.5;

/// Configuration for the safety classifier
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SafetyConfig {
    /// Literal phrases treated as critical in addition to the built-in list
    #[serde(default)]
    pub extra_critical_phrases: Vec<String>,
    /// Literal phrases treated as elevated in addition to the built-in list
    #[serde(default)]
    pub extra_elevated_phrases: Vec<String>,
    /// Help text shown to users when crisis language is detected
    #[serde(default = "default_resources")]
    pub resources: String,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            extra_critical_phrases: Vec::new(),
            extra_elevated_phrases: Vec::new(),
            resources: default_resources(),
        }
    }
}

fn default_resources() -> String {
    DEFAULT_CRISIS_RESOURCES.to_string()
}

/// Combined sentiment + crisis classifier
#[derive(Debug, Clone)]
pub struct SafetyClassifier {
    detector: CrisisDetector,
    analyzer: SentimentAnalyzer,
    resources: String,
}

impl Default for SafetyClassifier {
    fn default() -> Self {
        Self::new(&SafetyConfig::default())
    }
}

impl SafetyClassifier {
    pub fn new(config: &SafetyConfig) -> Self {
        Self {
            detector: CrisisDetector::with_extra_phrases(
                &config.extra_critical_phrases,
                &config.extra_elevated_phrases,
            ),
            analyzer: SentimentAnalyzer::new(),
            resources: config.resources.clone(),
        }
    }

    /// Help text for users in crisis
    pub fn resources(&self) -> &str {
        &self.resources
    }

    /// Classify one message. Crisis language always yields a negative verdict.
    pub fn assess(&self, text: &str) -> SafetyVerdict {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return SafetyVerdict::neutral();
        }

        let crisis = self.detector.detect_normalized(&normalized);
        let (mut sentiment, mut score) = self.analyzer.analyze_normalized(&normalized);

        if crisis.detected {
            sentiment = Sentiment::Negative;
            score = score.min(CRISIS_SCORE_CEILING);
            tracing::debug!(
                level = %crisis.level,
                terms = ?crisis.matched_terms,
                "Crisis language detected"
            );
        }

        SafetyVerdict {
            sentiment,
            score,
            crisis,
        }
    }
}
