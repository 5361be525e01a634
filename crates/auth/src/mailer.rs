use async_trait::async_trait;
use thiserror::Error;

/// Errors from the outbound email collaborator.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The message could not be built (bad address, malformed content).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The transport failed to deliver (connection, SMTP rejection).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivers one-time codes to the admin.
///
/// Delivery is part of the OTP issue transaction: the authenticator stores
/// a pending code only after `send_otp` returns `Ok`, so a failed send can
/// never strand an unusable pending state.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_otp(&self, recipient: &str, code: &str) -> Result<(), MailerError>;
}
