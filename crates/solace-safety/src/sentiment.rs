use solace_types::Sentiment;

use crate::normalize::normalize;

const POSITIVE_WORDS: &[&str] = &[
    "happy", "good", "great", "better", "calm", "grateful", "thankful", "hopeful",
    "relaxed", "proud", "excited", "love", "loved", "joy", "glad", "peaceful",
    "content", "wonderful", "amazing", "fine", "safe", "confident", "motivated",
    "rested", "energized", "optimistic", "relieved", "supported", "cheerful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad", "anxious", "anxiety", "depressed", "depression", "stressed", "stress",
    "angry", "lonely", "alone", "tired", "worried", "afraid", "scared", "upset",
    "hurt", "awful", "terrible", "bad", "worse", "worst", "hate", "miserable",
    "overwhelmed", "hopeless", "worthless", "panic", "crying", "exhausted",
    "numb", "empty", "ashamed", "guilty", "frustrated", "nervous", "broken",
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "isn't", "wasn't", "can't", "cant",
    "cannot", "didn't", "doesn't", "aren't", "won't", "nothing", "hardly",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "so", "extremely", "too", "super", "incredibly", "deeply",
    "totally",
];

/// Tokens before a sentiment word that can negate it
const NEGATION_WINDOW: usize = 2;
const INTENSIFIER_WEIGHT: f32 = 1.5;
/// Scores at or beyond this magnitude get a non-neutral label
pub const LABEL_THRESHOLD: f32 = 0.2;

/// Lexicon-based sentiment scoring
#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score text in [-1.0, 1.0] and label it
    pub fn analyze(&self, text: &str) -> (Sentiment, f32) {
        let normalized = normalize(text);
        self.analyze_normalized(&normalized)
    }

    pub(crate) fn analyze_normalized(&self, normalized: &str) -> (Sentiment, f32) {
        let score = self.score(normalized);
        (Self::label(score), score)
    }

    /// Map a score to its label
    pub fn label(score: f32) -> Sentiment {
        if score >= LABEL_THRESHOLD {
            Sentiment::Positive
        } else if score <= -LABEL_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    fn score(&self, normalized: &str) -> f32 {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let mut sum = 0.0f32;
        let mut hits = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let polarity = if POSITIVE_WORDS.contains(token) {
                1.0
            } else if NEGATIVE_WORDS.contains(token) {
                -1.0
            } else {
                continue;
            };

            let mut value = polarity;
            if i > 0 && INTENSIFIERS.contains(&tokens[i - 1]) {
                value *= INTENSIFIER_WEIGHT;
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|t| NEGATORS.contains(t)) {
                value = -value;
            }

            sum += value;
            hits += 1;
        }

        if hits == 0 {
            return 0.0;
        }

        let raw = (sum / ((hits + 1) as f32).sqrt()).clamp(-1.0, 1.0);
        (raw * 100.0).round() / 100.0
    }
}
