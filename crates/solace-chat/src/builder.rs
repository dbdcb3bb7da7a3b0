use std::sync::Arc;

use anyhow::{anyhow, Result};
use solace_llm::LLMClient;
use solace_persist::PersistenceClient;
use solace_safety::SafetyClassifier;

use crate::config::ChatConfig;
use crate::hub::EventHub;
use crate::service::ChatService;

/// Builder for constructing a ChatService with optional components
pub struct ChatServiceBuilder {
    llm_client: Option<Arc<dyn LLMClient>>,
    store: Option<Arc<dyn PersistenceClient>>,
    classifier: Option<Arc<SafetyClassifier>>,
    hub: Option<Arc<EventHub>>,
    config: ChatConfig,
}

impl ChatServiceBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            store: None,
            classifier: None,
            hub: None,
            config: ChatConfig::default(),
        }
    }

    /// Set the LLM client
    pub fn llm_client(mut self, client: Arc<dyn LLMClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    /// Set the persistence client
    pub fn persistence(mut self, client: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(client);
        self
    }

    /// Use a configured classifier instead of the built-in phrase lists
    pub fn classifier(mut self, classifier: Arc<SafetyClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Share an event hub with other components (the WebSocket route)
    pub fn hub(mut self, hub: Arc<EventHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the ChatService
    pub fn build(self) -> Result<ChatService> {
        let llm_client = self
            .llm_client
            .ok_or_else(|| anyhow!("LLM client is required"))?;
        let store = self
            .store
            .ok_or_else(|| anyhow!("Persistence client is required"))?;

        Ok(ChatService::new(
            llm_client,
            store,
            self.classifier.unwrap_or_default(),
            self.hub.unwrap_or_default(),
            self.config,
        ))
    }
}

impl Default for ChatServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
