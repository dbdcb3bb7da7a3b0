use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use solace_chat::{ChatOutcome, SendMessage};
use solace_types::{CrisisFlags, Sentiment};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub message: String,
    /// Omit to start a new session
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageResponse {
    pub reply: String,
    pub session_id: String,
    pub message_id: String,
    pub reply_id: String,
    #[schema(value_type = String, example = "neutral")]
    pub sentiment: Sentiment,
    pub sentiment_score: f32,
    #[schema(value_type = Object)]
    pub crisis: CrisisFlags,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_resources: Option<String>,
}

impl From<ChatOutcome> for SendMessageResponse {
    fn from(outcome: ChatOutcome) -> Self {
        Self {
            reply: outcome.reply,
            session_id: outcome.session_id,
            message_id: outcome.user_message_id,
            reply_id: outcome.reply_message_id,
            sentiment: outcome.verdict.sentiment,
            sentiment_score: outcome.verdict.score,
            crisis: outcome.verdict.crisis,
            fallback: outcome.fallback,
            crisis_resources: outcome.crisis_resources,
        }
    }
}

/// Send a message and receive the assistant's reply
///
/// The reply is also pushed to any open WebSocket of the user.
#[utoipa::path(
    post,
    path = "/chat/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Reply generated", body = SendMessageResponse),
        (status = 400, description = "Empty or oversized message"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Session not found")
    ),
    security(("bearer" = [])),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let outcome = state
        .chat
        .send_message(SendMessage {
            user_id: auth.user_id().to_string(),
            session_id: req.session_id,
            content: req.message,
        })
        .await?;

    Ok(Json(outcome.into()))
}
