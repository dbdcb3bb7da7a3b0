use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::gemini::GeminiClient;
use crate::openai::OpenAIClient;
use crate::traits::LLMClient;

/// Supported chat providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    #[default]
    Gemini,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
        }
    }
}

/// Everything needed to build a client for one provider
///
/// Serialized form: `{"type": "gemini", "api_key": "...", "base_url": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider: ProviderType,
    pub api_key: String,
    /// Public endpoint when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderType, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::OpenAI, api_key)
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::Gemini, api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }
}

/// Builds the configured provider behind the `LLMClient` trait
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn LLMClient>> {
        let ProviderConfig {
            provider,
            api_key,
            base_url,
        } = config;

        let client: Arc<dyn LLMClient> = match provider {
            ProviderType::OpenAI => {
                let client = OpenAIClient::new(api_key)?;
                Arc::new(match base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                })
            }
            ProviderType::Gemini => {
                let mut builder = GeminiClient::builder().api_key(api_key);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Arc::new(builder.build()?)
            }
        };

        tracing::debug!(provider = provider.as_str(), "LLM client created");
        Ok(client)
    }
}
