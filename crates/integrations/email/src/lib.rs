//! SMTP implementation of the [`folio_auth::OtpMailer`] seam.

pub mod config;
pub mod mailer;

pub use config::EmailConfig;
pub use mailer::{LogMailer, SmtpMailer};
