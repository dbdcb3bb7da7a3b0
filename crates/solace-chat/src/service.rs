use std::sync::Arc;

use solace_llm::{ChatClient, ChatOptions, ChatRequest, LLMClient, Message};
use solace_persist::{ChatSession, PersistError, PersistenceClient, StoredMessage};
use solace_safety::SafetyClassifier;
use solace_types::{ChatEvent, CrisisLevel, SafetyVerdict, Sender};

use crate::builder::ChatServiceBuilder;
use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::fallback::{crisis_reply, fallback_reply, with_resources};
use crate::hub::EventHub;

/// Longest accepted user message, in characters
pub const MAX_MESSAGE_CHARS: usize = 4000;
/// Auto-created sessions are titled with this many leading characters
const TITLE_CHARS: usize = 40;
pub const DEFAULT_PAGE: i64 = 50;
pub const MAX_PAGE: i64 = 200;

/// Page size actually applied for a requested `limit`
pub fn page_size(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE)
}

/// One incoming user message
#[derive(Debug, Clone)]
pub struct SendMessage {
    pub user_id: String,
    /// Continue an existing session, or start a new one when `None`
    pub session_id: Option<String>,
    pub content: String,
}

/// Everything produced for one message
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub session_id: String,
    pub user_message_id: String,
    pub reply_message_id: String,
    pub reply: String,
    pub verdict: SafetyVerdict,
    /// Reply is canned text because the provider failed
    pub fallback: bool,
    /// Help resources, present whenever crisis language was detected
    pub crisis_resources: Option<String>,
}

pub struct ChatService {
    llm_client: Arc<dyn LLMClient>,
    store: Arc<dyn PersistenceClient>,
    classifier: Arc<SafetyClassifier>,
    hub: Arc<EventHub>,
    config: ChatConfig,
}

impl ChatService {
    pub(crate) fn new(
        llm_client: Arc<dyn LLMClient>,
        store: Arc<dyn PersistenceClient>,
        classifier: Arc<SafetyClassifier>,
        hub: Arc<EventHub>,
        config: ChatConfig,
    ) -> Self {
        Self {
            llm_client,
            store,
            classifier,
            hub,
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> ChatServiceBuilder {
        ChatServiceBuilder::new()
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.llm_client.provider_name()
    }

    /// Classify, store and answer one user message
    pub async fn send_message(&self, input: SendMessage) -> Result<ChatOutcome, ChatError> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let len = content.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(ChatError::MessageTooLong {
                len,
                max: MAX_MESSAGE_CHARS,
            });
        }

        let user_id = input.user_id.as_str();
        let session = match input.session_id.as_deref() {
            Some(session_id) => self.owned_session(user_id, session_id).await?,
            None => self.open_session(user_id, content).await?,
        };

        let verdict = self.classifier.assess(content);
        let history = self.recent_history(&session.id).await?;

        let user_message = self
            .store
            .save_message(StoredMessage::from_user(&session.id, user_id, content, &verdict))
            .await?;
        self.store
            .touch_session(&session.id, verdict.crisis.detected)
            .await?;
        self.hub.publish(
            user_id,
            ChatEvent::MessageReceived {
                session_id: session.id.clone(),
                message_id: user_message.id.clone(),
                content: content.to_string(),
                verdict: verdict.clone(),
            },
        );

        let resources = self.classifier.resources();
        let (reply, fallback) = match verdict.crisis.level {
            CrisisLevel::Critical => {
                tracing::warn!(
                    user_id,
                    session_id = %session.id,
                    "Critical crisis language, sending crisis response"
                );
                (crisis_reply(resources), false)
            }
            level => {
                let (reply, fallback) = match self.generate(&history, content).await {
                    Some(reply) => (reply, false),
                    None => (
                        fallback_reply(verdict.sentiment, history.len()).to_string(),
                        true,
                    ),
                };
                if level == CrisisLevel::Elevated {
                    (with_resources(&reply, resources), fallback)
                } else {
                    (reply, fallback)
                }
            }
        };

        let ai_message = self
            .store
            .save_message(StoredMessage::from_ai(&session.id, user_id, &reply, fallback))
            .await?;
        self.store.touch_session(&session.id, false).await?;
        self.hub.publish(
            user_id,
            ChatEvent::Reply {
                session_id: session.id.clone(),
                message_id: ai_message.id.clone(),
                content: reply.clone(),
                fallback,
            },
        );

        let crisis_resources = verdict.crisis.detected.then(|| resources.to_string());
        if let Some(resources) = &crisis_resources {
            self.hub.publish(
                user_id,
                ChatEvent::CrisisAlert {
                    session_id: session.id.clone(),
                    level: verdict.crisis.level,
                    resources: resources.clone(),
                },
            );
        }

        tracing::info!(
            user_id,
            session_id = %session.id,
            sentiment = %verdict.sentiment,
            crisis = %verdict.crisis.level,
            fallback,
            "Chat message handled"
        );

        Ok(ChatOutcome {
            session_id: session.id,
            user_message_id: user_message.id,
            reply_message_id: ai_message.id,
            reply,
            verdict,
            fallback,
            crisis_resources,
        })
    }

    /// Messages of a session owned by the user, oldest first
    pub async fn history(
        &self,
        user_id: &str,
        session_id: &str,
        limit: Option<i64>,
        before: Option<&str>,
    ) -> Result<Vec<StoredMessage>, ChatError> {
        self.owned_session(user_id, session_id).await?;
        let limit = page_size(limit);
        Ok(self
            .store
            .get_messages(session_id, Some(limit), before)
            .await?)
    }

    /// Sessions of the user, most recently active first
    pub async fn sessions(
        &self,
        user_id: &str,
        limit: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<ChatSession>, ChatError> {
        let limit = page_size(limit);
        let skip = skip.map(|s| s.max(0));
        Ok(self.store.list_sessions(user_id, Some(limit), skip).await?)
    }

    pub async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<(), ChatError> {
        match self.store.delete_session(session_id, user_id).await {
            Ok(true) => {
                tracing::info!(user_id, session_id, "Session deleted");
                Ok(())
            }
            Ok(false) | Err(PersistError::InvalidObjectId(_)) => {
                Err(ChatError::SessionNotFound(session_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn owned_session(&self, user_id: &str, session_id: &str) -> Result<ChatSession, ChatError> {
        match self.store.get_session(session_id).await {
            Ok(Some(session)) if session.is_owned_by(user_id) => Ok(session),
            Ok(_) | Err(PersistError::InvalidObjectId(_)) => {
                Err(ChatError::SessionNotFound(session_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn open_session(&self, user_id: &str, content: &str) -> Result<ChatSession, ChatError> {
        let title: String = content.chars().take(TITLE_CHARS).collect();
        let title = title.trim_end().to_string();
        let session = self.store.create_session(user_id, Some(title)).await?;

        tracing::debug!(user_id, session_id = %session.id, "Session created");
        self.hub.publish(
            user_id,
            ChatEvent::SessionCreated {
                session_id: session.id.clone(),
                title: session.title.clone(),
            },
        );
        Ok(session)
    }

    /// Last `history_limit` messages of the session, starting at a user turn
    async fn recent_history(&self, session_id: &str) -> Result<Vec<StoredMessage>, ChatError> {
        if self.config.history_limit == 0 {
            return Ok(Vec::new());
        }
        let mut history = self
            .store
            .get_messages(session_id, Some(self.config.history_limit as i64), None)
            .await?;
        // providers expect the turns after the system prompt to open with the user
        let start = history
            .iter()
            .position(|m| m.sender == Sender::User)
            .unwrap_or(history.len());
        history.drain(..start);
        Ok(history)
    }

    /// Ask the provider for a reply. `None` means the caller should fall back.
    async fn generate(&self, history: &[StoredMessage], content: &str) -> Option<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !self.config.system_prompt.trim().is_empty() {
            messages.push(Message::system(self.config.system_prompt.as_str()));
        }
        messages.extend(history.iter().map(Message::from));
        messages.push(Message::human(content));

        let mut options = ChatOptions::new();
        if let Some(temp) = self.config.temperature {
            options = options.temperature(temp);
        }
        if let Some(max_tokens) = self.config.max_output_tokens {
            options = options.max_tokens(max_tokens);
        }
        let request = ChatRequest::new(self.config.model.clone(), messages).with_options(options);

        let provider = self.llm_client.provider_name();
        match tokio::time::timeout(self.config.provider_timeout(), self.llm_client.chat(request)).await {
            Ok(Ok(response)) => match response.text() {
                Some(text) => Some(text.to_string()),
                None => {
                    tracing::warn!(provider, "Provider returned an empty reply, using fallback");
                    None
                }
            },
            Ok(Err(e)) => {
                tracing::error!(provider, "Provider call failed, using fallback: {:#}", e);
                None
            }
            Err(_) => {
                tracing::error!(
                    provider,
                    timeout_secs = self.config.provider_timeout_secs,
                    "Provider call timed out, using fallback"
                );
                None
            }
        }
    }
}
