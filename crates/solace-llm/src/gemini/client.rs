// Google Gemini client implementation

use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, LLMClient, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, no SDK)
///
/// Gemini differs from OpenAI in a few ways:
/// - URL: {base}/models/{model}:generateContent
/// - Auth header: x-goog-api-key instead of Authorization: Bearer
/// - System prompts travel in `systemInstruction`, assistant turns use role `model`
#[derive(Debug)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create new client with API key against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    /// Build generateContent payload
    fn build_generate_request(&self, messages: Vec<Message>, options: &ChatOptions) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for message in &messages {
            let text = message.text();
            match message {
                Message::System { .. } => {
                    system_parts.push(serde_json::json!({ "text": text }));
                }
                Message::Human { .. } => {
                    contents.push(serde_json::json!({
                        "role": "user",
                        "parts": [{ "text": text }],
                    }));
                }
                Message::AI { .. } => {
                    contents.push(serde_json::json!({
                        "role": "model",
                        "parts": [{ "text": text }],
                    }));
                }
            }
        }

        let mut request = serde_json::Map::new();
        request.insert("contents".to_string(), Value::Array(contents));

        if !system_parts.is_empty() {
            request.insert(
                "systemInstruction".to_string(),
                serde_json::json!({ "parts": system_parts }),
            );
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }
        if !generation_config.is_empty() {
            request.insert("generationConfig".to_string(), Value::Object(generation_config));
        }

        Value::Object(request)
    }
}

/// Builder for GeminiClient
#[derive(Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL
    /// Example: "https://generativelanguage.googleapis.com/v1beta"
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self.api_key.context("API key is required")?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GeminiClient {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let payload = self.build_generate_request(request.messages, &request.options);

        let response = self
            .http_client
            .post(url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let raw: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let candidate = raw.candidates.first();
        let content = candidate.and_then(|c| c.content.as_ref()).map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        });

        Ok(ChatResponse {
            content,
            usage: raw.usage_metadata.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

impl LLMClient for GeminiClient {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// GEMINI-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let err = GeminiClient::builder().build().unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_system_messages_become_system_instruction() {
        let client = GeminiClient::new("test-key").unwrap();
        let payload = client.build_generate_request(
            vec![
                Message::system("You are a supportive companion."),
                Message::human("hello"),
                Message::ai("hi there"),
                Message::human("how are you?"),
            ],
            &ChatOptions::new().temperature(0.4).max_tokens(300),
        );

        assert_eq!(
            payload["systemInstruction"]["parts"][0]["text"],
            "You are a supportive companion."
        );
        let contents = payload["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 300);
    }

    #[test]
    fn test_no_generation_config_without_options() {
        let client = GeminiClient::new("test-key").unwrap();
        let payload = client.build_generate_request(vec![Message::human("hi")], &ChatOptions::default());
        assert!(payload.get("generationConfig").is_none());
        assert!(payload.get("systemInstruction").is_none());
    }
}
