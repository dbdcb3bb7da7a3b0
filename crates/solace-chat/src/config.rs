use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Solace, a warm and supportive mental-wellness companion. \
Listen carefully, reflect feelings back with empathy, and offer gentle, practical coping ideas. \
You are not a therapist and do not diagnose or prescribe. \
Keep replies short and conversational. \
If the user mentions self-harm or suicide, encourage them to contact a crisis line or emergency services right away.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// Stored messages sent to the provider as context
    pub history_limit: usize,
    pub system_prompt: String,
    /// Provider calls slower than this fall back to canned text
    pub provider_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: Some(0.7),
            max_output_tokens: Some(512),
            history_limit: 20,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            provider_timeout_secs: 30,
        }
    }
}

impl ChatConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout_secs = timeout.as_secs();
        self
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}
