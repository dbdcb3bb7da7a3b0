use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use solace_persist::User;

use crate::auth::password::{generate_salt, hash_password, verify_password};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MIN_AGE: u32 = 13;
pub const MAX_AGE: u32 = 120;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub age: u32,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub age: u32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&req)?;

    if state.persist.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let salt = generate_salt();
    let hash = hash_password(&salt, &req.password);
    let user = state
        .persist
        .create_user(User::new(&req.email, hash, salt, req.age, req.terms_accepted))
        .await?;

    tracing::info!(user_id = %user.id, "User registered");
    let token = state.jwt.issue(&user.id, &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .persist
        .find_user_by_email(&req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&user.password_salt, &req.password, &user.password_hash) {
        tracing::info!(user_id = %user.id, "Login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.issue(&user.id, &user.email)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .persist
        .get_user(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user.into()))
}

fn validate_registration(req: &RegisterRequest) -> ApiResult<()> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::BadRequest("A valid email address is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&req.age) {
        return Err(ApiError::BadRequest(format!(
            "Age must be between {} and {}",
            MIN_AGE, MAX_AGE
        )));
    }
    if !req.terms_accepted {
        return Err(ApiError::BadRequest("Terms must be accepted".to_string()));
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str, age: u32, terms: bool) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            age,
            terms_accepted: terms,
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("sam@example.com"));
        assert!(is_valid_email(" sam.lee@mail.example.org "));
        assert!(!is_valid_email("sam.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("sam@example"));
        assert!(!is_valid_email("sam@.com"));
        assert!(!is_valid_email("sam@example."));
        assert!(!is_valid_email("sam lee@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration(&request("a@b.co", "longenough", 30, true)).is_ok());
        assert!(validate_registration(&request("a@b.co", "short", 30, true)).is_err());
        assert!(validate_registration(&request("a@b.co", "longenough", 12, true)).is_err());
        assert!(validate_registration(&request("a@b.co", "longenough", 121, true)).is_err());
        assert!(validate_registration(&request("a@b.co", "longenough", 13, false)).is_err());
        assert!(validate_registration(&request("a@b.co", "longenough", 120, true)).is_ok());
    }
}
