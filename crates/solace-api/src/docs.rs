use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes::{auth, chat, health, sessions, ws};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        chat::send_message,
        sessions::list_sessions,
        sessions::get_history,
        sessions::delete_session,
        ws::ws_handler,
    ),
    components(schemas(
        health::HealthResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::AuthResponse,
        auth::UserResponse,
        chat::SendMessageRequest,
        chat::SendMessageResponse,
        sessions::SessionResponse,
        sessions::SessionListResponse,
        sessions::MessageResponse,
        sessions::HistoryResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Service status"),
        (name = "auth", description = "Registration and login"),
        (name = "chat", description = "Messaging and live events"),
        (name = "sessions", description = "Conversation history")
    ),
    info(
        title = "Solace API",
        description = "Supportive chat companion backend"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/register",
            "/auth/login",
            "/auth/me",
            "/chat/messages",
            "/chat/sessions",
            "/chat/sessions/{session_id}/messages",
            "/chat/sessions/{session_id}",
            "/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
