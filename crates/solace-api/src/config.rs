use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use solace_chat::ChatConfig;
use solace_llm::{ProviderConfig, ProviderType};
use solace_safety::SafetyConfig;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub mongodb: MongoDbConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default)]
    pub llm_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole HTTP request, provider call included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    /// Stored messages sent along as context
    pub history_limit: usize,
    pub timeout_secs: u64,
    /// Overrides the built-in companion prompt
    pub system_prompt: Option<String>,
    /// Custom endpoint (proxies, local gateways)
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn chat_config(&self) -> ChatConfig {
        let mut chat = ChatConfig::new(self.model.clone()).with_history_limit(self.history_limit);
        chat.temperature = self.temperature;
        chat.max_output_tokens = self.max_output_tokens;
        chat.provider_timeout_secs = self.timeout_secs;
        if let Some(prompt) = &self.system_prompt {
            chat = chat.with_system_prompt(prompt.clone());
        }
        chat
    }

    pub fn provider_config(&self, api_key: &str) -> ProviderConfig {
        let config = match self.provider {
            ProviderType::OpenAI => ProviderConfig::openai(api_key),
            ProviderType::Gemini => ProviderConfig::gemini(api_key),
        };
        match &self.base_url {
            Some(base_url) => config.with_base_url(base_url.clone()),
            None => config,
        }
    }

    /// Environment variable holding the provider key
    pub fn api_key_var(&self) -> &'static str {
        match self.provider {
            ProviderType::OpenAI => "OPENAI_API_KEY",
            ProviderType::Gemini => "GEMINI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables `SOLACE_<SECTION>__<KEY>` (e.g. `SOLACE_SERVER__PORT`)
    ///
    /// Secrets never come from files: `JWT_SECRET`, the provider key and,
    /// for the MongoDB backend, `MONGODB_URI`.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Environment variables override everything
            .add_source(
                Environment::with_prefix("SOLACE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;
        cfg.load_secrets()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn load_secrets(&mut self) -> Result<(), ConfigError> {
        self.jwt_secret = required_env("JWT_SECRET")?;
        self.llm_api_key = required_env(self.llm.api_key_var())?;
        if self.storage.backend == StorageBackend::Mongodb {
            self.mongodb_uri = required_env("MONGODB_URI")?;
        }
        Ok(())
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Message(format!("{} environment variable is required", name)))
}
