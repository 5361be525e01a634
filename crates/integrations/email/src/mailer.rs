use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, instrument};

use folio_auth::{MailerError, OtpMailer};

use crate::config::EmailConfig;

/// Delivers one-time codes over SMTP using `lettre`.
pub struct SmtpMailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("config", &self.config)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl SmtpMailer {
    /// Create a mailer from the given configuration.
    ///
    /// Builds an [`AsyncSmtpTransport`] with the configured host, port, TLS
    /// setting, and optional credentials.
    pub fn new(config: EmailConfig) -> Result<Self, MailerError> {
        let transport = build_transport(&config)?;
        Ok(Self { config, transport })
    }

    /// Create a mailer with a pre-built transport, for tests.
    pub fn with_transport(
        config: EmailConfig,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    ) -> Self {
        Self { config, transport }
    }
}

/// Build an async SMTP transport from the given configuration.
fn build_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
    let builder = if config.tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailerError::InvalidMessage(format!("SMTP TLS relay error: {e}")))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let builder = builder.port(config.smtp_port);

    let builder = if let (Some(user), Some(pass)) = (&config.username, &config.password) {
        builder.credentials(Credentials::new(user.clone(), pass.clone()))
    } else {
        builder
    };

    Ok(builder.build())
}

/// Build the OTP message: bilingual body, text and HTML alternatives.
///
/// This is a free function so it can be tested independently of the async
/// SMTP transport (which requires a Tokio runtime to construct).
fn build_message(
    config: &EmailConfig,
    recipient: &str,
    code: &str,
) -> Result<Message, MailerError> {
    let from_mailbox: Mailbox = config
        .from_address
        .parse()
        .map_err(|e| MailerError::InvalidMessage(format!("invalid from address: {e}")))?;

    let to_mailbox: Mailbox = recipient
        .parse()
        .map_err(|e| MailerError::InvalidMessage(format!("invalid recipient address: {e}")))?;

    let text = format!(
        "Your verification code is: {code}\n\
         This code expires in 5 minutes.\n\n\
         認証コード: {code}\n\
         このコードの有効期限は5分です。\n"
    );
    let html = format!(
        "<p>Your verification code is: <strong>{code}</strong><br>\
         This code expires in 5 minutes.</p>\
         <p>認証コード: <strong>{code}</strong><br>\
         このコードの有効期限は5分です。</p>"
    );

    Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject("Your verification code / 認証コード")
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html),
                ),
        )
        .map_err(|e| MailerError::InvalidMessage(format!("failed to build email: {e}")))
}

/// Map a lettre SMTP error to the appropriate `MailerError` variant.
fn map_smtp_error(error: &lettre::transport::smtp::Error) -> MailerError {
    let message = error.to_string();

    if error.is_permanent() {
        MailerError::InvalidMessage(format!("permanent SMTP error: {message}"))
    } else {
        // Transient, TLS, connection, and response parsing errors.
        MailerError::Transport(format!("SMTP error: {message}"))
    }
}

#[async_trait]
impl OtpMailer for SmtpMailer {
    #[instrument(skip_all, fields(to = %recipient))]
    async fn send_otp(&self, recipient: &str, code: &str) -> Result<(), MailerError> {
        debug!("building one-time code message");
        let message = build_message(&self.config, recipient, code)?;

        self.transport.send(message).await.map_err(|e| {
            error!(error = %e, "SMTP send failed");
            map_smtp_error(&e)
        })?;

        info!("one-time code dispatched");
        Ok(())
    }
}

/// Writes codes to the server log instead of sending them.
///
/// Used when no `[email]` section is configured. Local development only:
/// anyone who can read the log can log in.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl OtpMailer for LogMailer {
    async fn send_otp(&self, recipient: &str, code: &str) -> Result<(), MailerError> {
        tracing::warn!(to = %recipient, %code, "no SMTP configured; one-time code logged");
        Ok(())
    }
}
