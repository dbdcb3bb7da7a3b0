use std::sync::Arc;

use solace_chat::{ChatService, EventHub};
use solace_persist::PersistenceClient;

use crate::auth::JwtService;
use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub chat: Arc<ChatService>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: Arc<dyn PersistenceClient>,
        chat: ChatService,
        jwt: JwtService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            chat: Arc::new(chat),
            jwt: Arc::new(jwt),
        }
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        self.chat.hub()
    }
}
