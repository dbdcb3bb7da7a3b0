use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use solace_chat::page_size;
use solace_persist::{ChatSession, StoredMessage};
use solace_types::{CrisisFlags, Sender, Sentiment};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSessionsQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    /// Return messages older than this message id
    pub before: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: String,
    pub title: Option<String>,
    pub message_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_crisis_at: Option<DateTime<Utc>>,
}

impl From<ChatSession> for SessionResponse {
    fn from(session: ChatSession) -> Self {
        Self {
            session_id: session.id,
            title: session.title,
            message_count: session.message_count,
            created_at: session.created_at,
            updated_at: session.updated_at,
            last_crisis_at: session.last_crisis_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionResponse>,
    pub has_more: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message_id: String,
    #[schema(value_type = String, example = "user")]
    pub sender: Sender,
    pub content: String,
    #[schema(value_type = Option<String>)]
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: Option<f32>,
    #[schema(value_type = Object)]
    pub crisis: CrisisFlags,
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for MessageResponse {
    fn from(message: StoredMessage) -> Self {
        Self {
            message_id: message.id,
            sender: message.sender,
            content: message.content,
            sentiment: message.sentiment,
            sentiment_score: message.sentiment_score,
            crisis: message.crisis,
            fallback: message.fallback,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<MessageResponse>,
    pub has_more: bool,
}

/// List the caller's sessions, most recently active first
#[utoipa::path(
    get,
    path = "/chat/sessions",
    params(ListSessionsQuery),
    responses(
        (status = 200, description = "Sessions", body = SessionListResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListSessionsQuery>,
) -> ApiResult<Json<SessionListResponse>> {
    let limit = page_size(query.limit);
    let sessions = state
        .chat
        .sessions(auth.user_id(), Some(limit), query.skip)
        .await?;
    let has_more = sessions.len() as i64 >= limit;

    Ok(Json(SessionListResponse {
        sessions: sessions.into_iter().map(Into::into).collect(),
        has_more,
    }))
}

/// Message history of a session, oldest first
#[utoipa::path(
    get,
    path = "/chat/sessions/{session_id}/messages",
    params(
        ("session_id" = String, Path, description = "Session id"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Messages", body = HistoryResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Session or cursor not found")
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let limit = page_size(query.limit);
    let messages = state
        .chat
        .history(auth.user_id(), &session_id, Some(limit), query.before.as_deref())
        .await?;
    let has_more = messages.len() as i64 >= limit;

    Ok(Json(HistoryResponse {
        session_id,
        messages: messages.into_iter().map(Into::into).collect(),
        has_more,
    }))
}

/// Delete a session and its messages
#[utoipa::path(
    delete,
    path = "/chat/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Session not found")
    ),
    security(("bearer" = [])),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.chat.delete_session(auth.user_id(), &session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
