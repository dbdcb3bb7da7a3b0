use regex::Regex;
use solace_types::{CrisisFlags, CrisisLevel};

use crate::normalize::normalize;

/// Resources appended to replies when crisis language is detected
pub const DEFAULT_CRISIS_RESOURCES: &str = "If you are in immediate danger, please call your local emergency number. \
You can reach the 988 Suicide & Crisis Lifeline (US) by calling or texting 988, \
text HOME to 741741 to reach the Crisis Text Line, \
or find a local helpline at https://findahelpline.com.";

/// Built-in crisis phrase patterns.
///
/// Each entry is `(term, pattern)`: `term` is what gets reported in
/// [`CrisisFlags::matched_terms`], `pattern` runs against normalized text.
pub struct CrisisPatterns;

impl CrisisPatterns {
    /// Explicit suicidal intent or self-harm
    pub const CRITICAL: &'static [(&'static str, &'static str)] = &[
        ("kill myself", r"\bkill(?:ing)? my ?self\b"),
        ("suicide", r"\bsuicid(?:e|al)\b"),
        ("end my life", r"\bend(?:ing)? (?:my life|it all)\b"),
        ("take my own life", r"\btak(?:e|ing) my (?:own )?life\b"),
        ("want to die", r"\b(?:want(?:ed)?|wanting) to die\b|\bwanna die\b"),
        ("don't want to live", r"\b(?:don't|do not|dont) want to (?:live|be alive|exist)\b"),
        ("better off dead", r"\bbetter off dead\b"),
        ("no reason to live", r"\bno reason to (?:live|go on)\b"),
        ("self harm", r"\bself harm(?:ing)?\b"),
        ("hurt myself", r"\b(?:hurt|hurting|harm|harming) my ?self\b"),
        ("cut myself", r"\bcut(?:ting)? my ?self\b"),
        ("overdose", r"\boverdos(?:e|ed|ing)\b"),
    ];

    /// Hopelessness language that warrants gentle follow-up
    pub const ELEVATED: &'static [(&'static str, &'static str)] = &[
        ("hopeless", r"\bhopeless(?:ness)?\b"),
        ("worthless", r"\bworthless\b"),
        ("can't go on", r"\b(?:can't|cannot|can not|cant) go on\b"),
        ("can't take it anymore", r"\b(?:can't|cannot|cant) take (?:it|this) any ?more\b"),
        ("no way out", r"\bno way out\b"),
        ("giving up", r"\bgiv(?:e|ing) up on (?:life|everything|myself)\b"),
        ("nobody cares", r"\b(?:nobody|no one) (?:cares|would care|would miss me)\b"),
        ("i'm a burden", r"\b(?:i'm|i am|im) (?:just )?a burden\b"),
        ("want to disappear", r"\bwant to disappear\b"),
        ("empty inside", r"\bempty inside\b"),
    ];
}

/// A match directly preceded by one of these is a denial ("i don't want to die")
const DENIALS: &[&str] = &["don't", "dont", "not", "never", "didn't", "didnt", "won't", "wont"];

/// Pattern rule for regex-based detection
#[derive(Debug, Clone)]
struct PatternRule {
    term: String,
    level: CrisisLevel,
    regex: Regex,
}

/// Static keyword/phrase matcher for self-harm language
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    rules: Vec<PatternRule>,
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CrisisDetector {
    /// Detector with the built-in phrase lists only
    pub fn new() -> Self {
        Self::with_extra_phrases(&[], &[])
    }

    /// Built-in lists plus literal phrases from configuration
    pub fn with_extra_phrases(critical: &[String], elevated: &[String]) -> Self {
        let mut rules = Vec::new();

        for (term, pattern) in CrisisPatterns::CRITICAL {
            push_rule(&mut rules, term, pattern, CrisisLevel::Critical);
        }
        for phrase in critical {
            push_literal(&mut rules, phrase, CrisisLevel::Critical);
        }
        for (term, pattern) in CrisisPatterns::ELEVATED {
            push_rule(&mut rules, term, pattern, CrisisLevel::Elevated);
        }
        for phrase in elevated {
            push_literal(&mut rules, phrase, CrisisLevel::Elevated);
        }

        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Scan text and report every matched term plus the worst level found
    pub fn detect(&self, text: &str) -> CrisisFlags {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return CrisisFlags::none();
        }
        self.detect_normalized(&normalized)
    }

    pub(crate) fn detect_normalized(&self, normalized: &str) -> CrisisFlags {
        let mut level = CrisisLevel::None;
        let mut matched_terms: Vec<String> = Vec::new();

        for rule in &self.rules {
            if rule.matches(normalized) {
                level = level.max(rule.level);
                if !matched_terms.contains(&rule.term) {
                    matched_terms.push(rule.term.clone());
                }
            }
        }

        CrisisFlags::new(level, matched_terms)
    }
}

impl PatternRule {
    /// True when some occurrence is not a direct denial
    fn matches(&self, normalized: &str) -> bool {
        self.regex.find_iter(normalized).any(|m| {
            let preceding = normalized[..m.start()].split_whitespace().next_back();
            !preceding.is_some_and(|word| DENIALS.contains(&word))
        })
    }
}

fn push_rule(rules: &mut Vec<PatternRule>, term: &str, pattern: &str, level: CrisisLevel) {
    match Regex::new(pattern) {
        Ok(regex) => rules.push(PatternRule {
            term: term.to_string(),
            level,
            regex,
        }),
        Err(e) => tracing::warn!(term, "Skipping invalid crisis pattern: {}", e),
    }
}

/// Configured phrases are matched literally after the same normalization as the input
fn push_literal(rules: &mut Vec<PatternRule>, phrase: &str, level: CrisisLevel) {
    let normalized = normalize(phrase);
    if normalized.is_empty() {
        return;
    }
    let pattern = format!(r"\b{}\b", regex::escape(&normalized));
    push_rule(rules, &normalized, &pattern, level);
}
