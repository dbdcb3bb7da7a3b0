use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use solace_chat::ChatError;
use solace_persist::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Persistence error: {0}")]
    Persist(PersistError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::DuplicateEmail(_) => ApiError::EmailTaken,
            PersistError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            PersistError::InvalidObjectId(_) => ApiError::BadRequest("Invalid id".to_string()),
            other => ApiError::Persist(other),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            ChatError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::Persist(e) => e.into(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::Persist(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show a client; server-side failures stay generic
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Persist(_) => "Storage error".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Log server-side failures with full detail
    pub fn log(&self) {
        match self {
            ApiError::Persist(e) => tracing::error!("Persistence error: {}", e),
            ApiError::Internal(e) => tracing::error!("Internal error: {:#}", e),
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status(), body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(PersistError::DuplicateEmail("a@b.co".into()))
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(ChatError::SessionNotFound("s".into()))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PersistError::Internal("boom".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = ApiError::from(ChatError::Persist(PersistError::Internal(
            "db host 10.0.0.5 refused".into(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Storage error");

        let err = ApiError::Internal(anyhow::anyhow!("jwt encode error: key rejected"));
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::from(ChatError::EmptyMessage);
        assert_eq!(err.public_message(), err.to_string());
    }
}
