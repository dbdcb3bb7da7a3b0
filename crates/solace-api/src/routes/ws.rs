use axum::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::Response;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use solace_chat::{ChatEvent, SendMessage};

use crate::auth::Claims;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Frames a client may send over the socket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    Message {
        content: String,
        #[serde(default)]
        session_id: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token for the socket handshake, taken from `?token=` or the Authorization header
pub struct WsAuth(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for WsAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let from_query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.token);
        let token = match from_query {
            Some(token) => token,
            None => parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|v| v.trim().to_string())
                .ok_or(ApiError::Unauthorized)?,
        };

        let claims = state.jwt.verify(&token).map_err(|e| {
            tracing::debug!("Rejected socket token: {}", e);
            ApiError::Unauthorized
        })?;
        Ok(WsAuth(claims))
    }
}

/// Live event channel for the authenticated user
///
/// Server pushes every `ChatEvent` of the user as a JSON text frame. Clients
/// may send `{"type":"message","content":"...","session_id":"..."}`.
#[utoipa::path(
    get,
    path = "/ws",
    params(("token" = Option<String>, Query, description = "Access token")),
    responses(
        (status = 101, description = "Switching to WebSocket"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "chat"
)]
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    WsAuth(claims): WsAuth,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let user_id = claims.sub;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let mut events = state.hub().subscribe(&user_id);
    tracing::info!(user_id = %user_id, "WebSocket connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "WebSocket client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            frame = socket.recv() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Err(message) = handle_frame(&state, &user_id, &text).await {
                        if send_event(&mut socket, &ChatEvent::error(message)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(user_id = %user_id, "WebSocket receive error: {}", e);
                    break;
                }
            },
        }
    }

    drop(events);
    state.hub().prune();
    tracing::info!(user_id = %user_id, "WebSocket disconnected");
}

/// Replies reach the socket through the hub, so only failures are returned
async fn handle_frame(state: &AppState, user_id: &str, text: &str) -> Result<(), String> {
    let frame: ClientFrame =
        serde_json::from_str(text).map_err(|e| format!("Invalid frame: {}", e))?;

    match frame {
        ClientFrame::Message {
            content,
            session_id,
        } => {
            state
                .chat
                .send_message(SendMessage {
                    user_id: user_id.to_string(),
                    session_id,
                    content,
                })
                .await
                .map_err(|e| {
                    let err = ApiError::from(e);
                    err.log();
                    err.public_message()
                })?;
        }
    }
    Ok(())
}

async fn send_event(socket: &mut WebSocket, event: &ChatEvent) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize event: {}", e);
            return Ok(());
        }
    };
    socket.send(WsMessage::Text(payload)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_frame_parsing() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"message","content":"hi"}"#).unwrap();
        match frame {
            ClientFrame::Message {
                content,
                session_id,
            } => {
                assert_eq!(content, "hi");
                assert!(session_id.is_none());
            }
        }

        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"typing"}"#).is_err());
        assert!(serde_json::from_str::<ClientFrame>("not json").is_err());
    }
}
