use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Admin user id.
    #[schema(example = "admin")]
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque id to echo back together with the emailed code.
    pub session_id: String,
    /// Seconds until the code expires.
    #[schema(example = 300)]
    pub expires_in: u64,
}

/// `POST /auth/login` -- check the admin credential and email a one-time
/// code.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    summary = "Login",
    description = "Validates the admin credential and dispatches a one-time code by email.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "One-time code issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 503, description = "Code delivery failed", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let challenge = state.auth.login(&body.user_id, &body.password).await?;
    Ok(Json(LoginResponse {
        session_id: challenge.session_id,
        expires_in: challenge.expires_in.as_secs(),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub session_id: String,
    /// The 6-digit code from the email.
    #[schema(example = "042137")]
    pub otp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    /// Absolute session lifetime in seconds.
    #[schema(example = 1800)]
    pub expires_in: u64,
}

/// `POST /auth/verify-otp` -- exchange a one-time code for a session token.
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "Auth",
    summary = "Verify one-time code",
    description = "Exchanges a verified code for a session token. Codes are single-use; \
                   a mismatch leaves the code retryable until it expires.",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Session established", body = VerifyOtpResponse),
        (status = 401, description = "Unknown challenge, expired, or mismatched code", body = ErrorResponse),
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let grant = state.auth.verify_otp(&body.session_id, &body.otp).await?;
    Ok(Json(VerifyOtpResponse {
        session_token: grant.token,
        expires_in: grant.expires_in.as_secs(),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokenRequest {
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSessionResponse {
    /// Seconds of absolute session lifetime left.
    #[schema(example = 1200)]
    pub remaining_time: u64,
}

/// `POST /auth/validate-session` -- check a session token and bump its
/// activity clock.
#[utoipa::path(
    post,
    path = "/auth/validate-session",
    tag = "Auth",
    summary = "Validate session",
    description = "Validates a session token against both expiry clocks and extends the \
                   inactivity window.",
    request_body = SessionTokenRequest,
    responses(
        (status = 200, description = "Session is live", body = ValidateSessionResponse),
        (status = 401, description = "Unknown or expired session", body = ErrorResponse),
    )
)]
pub async fn validate_session(
    State(state): State<AppState>,
    Json(body): Json<SessionTokenRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let status = state.auth.validate_session(&body.session_token).await?;
    Ok(Json(ValidateSessionResponse {
        remaining_time: status.remaining.as_secs(),
    }))
}

/// `POST /auth/logout` -- terminate a session.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    summary = "Logout",
    description = "Deletes the session. Idempotent: succeeds whether or not the session \
                   still existed.",
    request_body = SessionTokenRequest,
    responses(
        (status = 200, description = "Logged out"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<SessionTokenRequest>,
) -> Result<impl IntoResponse, ServerError> {
    state.auth.logout(&body.session_token).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "status": "logged_out" })),
    ))
}
