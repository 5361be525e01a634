use thiserror::Error;

use folio_state::StateError;

use crate::mailer::MailerError;

/// Which expiry clock killed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// The session outlived its absolute lifetime since login.
    Absolute,
    /// The session went unused for longer than the inactivity window.
    Inactivity,
}

impl std::fmt::Display for ExpiryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => f.write_str("absolute"),
            Self::Inactivity => f.write_str("inactivity"),
        }
    }
}

/// Errors from the authenticator.
///
/// Credential failures are deliberately coarse: the caller never learns
/// which field was wrong. OTP failures are specific so the user knows
/// whether to re-type the code or request a new one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session not found")]
    SessionNotFound,

    #[error("one-time code expired")]
    OtpExpired,

    #[error("one-time code mismatch")]
    OtpMismatch,

    #[error("session expired ({reason})")]
    SessionExpired { reason: ExpiryReason },

    #[error("email delivery failed: {0}")]
    EmailDelivery(#[from] MailerError),

    #[error("state store error: {0}")]
    State(#[from] StateError),
}
