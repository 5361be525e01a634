use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use folio_auth::AuthError;
use folio_blob::BlobError;
use folio_document::DocumentError;

/// Errors that can occur when running the folio server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An authentication failure surfaced through the API.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A document operation failure surfaced through the API.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A blob storage failure surfaced through the API.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// Malformed request input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ServerError {
    /// HTTP status plus the client-visible message.
    ///
    /// Backend failure detail is logged and replaced with a generic
    /// message; raw lower-level error text never reaches the client.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::SessionNotFound
                | AuthError::OtpExpired
                | AuthError::OtpMismatch
                | AuthError::SessionExpired { .. } => (StatusCode::UNAUTHORIZED, err.to_string()),
                AuthError::EmailDelivery(detail) => {
                    tracing::error!(error = %detail, "one-time code delivery failed");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "could not deliver the one-time code".to_owned(),
                    )
                }
                AuthError::State(detail) => {
                    tracing::error!(error = %detail, "auth state store failed");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "authentication backend unavailable".to_owned(),
                    )
                }
            },
            Self::Document(err) => match err {
                DocumentError::InvalidOperation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                DocumentError::UnknownSection(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DocumentError::Conflict => (StatusCode::CONFLICT, err.to_string()),
                DocumentError::Storage(detail) => {
                    tracing::error!(error = %detail, "document store failed");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "document storage unavailable".to_owned(),
                    )
                }
                DocumentError::Serialization(detail) => {
                    tracing::error!(error = %detail, "document serialization failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_owned(),
                    )
                }
            },
            Self::Blob(err) => match err {
                BlobError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                BlobError::InvalidKey(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                BlobError::Storage(detail) => {
                    tracing::error!(error = %detail, "blob store failed");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "file storage unavailable".to_owned(),
                    )
                }
            },
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
