use serde::{Deserialize, Serialize};

/// Configuration for the SMTP mailer.
///
/// Sensible defaults are provided for common SMTP configurations (port
/// 587, TLS enabled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,

    /// SMTP server port. Defaults to 587 (STARTTLS submission port).
    #[serde(default = "default_port")]
    pub smtp_port: u16,

    /// Optional SMTP username for authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Optional SMTP password for authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// The `From` address used in outgoing emails.
    pub from_address: String,

    /// Whether to use TLS for the SMTP connection. Defaults to `true`.
    #[serde(default = "default_tls")]
    pub tls: bool,
}

fn default_port() -> u16 {
    587
}

fn default_tls() -> bool {
    true
}

impl EmailConfig {
    /// Create a new `EmailConfig` with the given SMTP host and sender
    /// address, defaults everywhere else.
    pub fn new(smtp_host: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            smtp_host: smtp_host.into(),
            smtp_port: default_port(),
            username: None,
            password: None,
            from_address: from_address.into(),
            tls: default_tls(),
        }
    }

    /// Set SMTP authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the default SMTP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }

    /// Set whether TLS should be used.
    #[must_use]
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self::new("localhost", "noreply@localhost")
    }
}
