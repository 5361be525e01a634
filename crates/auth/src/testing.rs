//! Test doubles for the email collaborator.
//!
//! Shipped as a regular module so downstream crates (the HTTP server's
//! tests in particular) can drive full login flows without an SMTP server.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::mailer::{MailerError, OtpMailer};

/// Records every dispatched code instead of sending it.
#[derive(Debug, Default)]
pub struct CaptureMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl CaptureMailer {
    /// Number of codes dispatched so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }

    /// The most recently dispatched code, if any.
    pub fn last_code(&self) -> Option<String> {
        self.sent
            .lock()
            .ok()
            .and_then(|sent| sent.last().map(|(_, code)| code.clone()))
    }

    /// The recipient of the most recent dispatch, if any.
    pub fn last_recipient(&self) -> Option<String> {
        self.sent
            .lock()
            .ok()
            .and_then(|sent| sent.last().map(|(to, _)| to.clone()))
    }
}

#[async_trait]
impl OtpMailer for CaptureMailer {
    async fn send_otp(&self, recipient: &str, code: &str) -> Result<(), MailerError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((recipient.to_owned(), code.to_owned()));
        }
        Ok(())
    }
}

/// Always fails delivery, for exercising the two-phase OTP issue.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl OtpMailer for FailingMailer {
    async fn send_otp(&self, _recipient: &str, _code: &str) -> Result<(), MailerError> {
        Err(MailerError::Transport("simulated SMTP outage".to_owned()))
    }
}
