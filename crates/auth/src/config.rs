use std::time::Duration;

use secrecy::SecretString;

/// The single admin credential, sourced from configuration at startup and
/// immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 hash of the admin password.
    pub password_hash: SecretString,
    /// Where one-time codes are delivered.
    pub email: String,
}

impl AdminCredentials {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: SecretString::new(password_hash.into()),
            email: email.into(),
        }
    }
}

/// Timing knobs for the authenticator.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long an issued one-time code stays verifiable.
    pub otp_ttl: Duration,
    /// Maximum session lifetime since login, regardless of activity.
    pub session_absolute_ttl: Duration,
    /// Maximum gap between validated requests.
    pub session_inactivity_ttl: Duration,
    /// How often the background sweep removes dead records.
    pub sweep_interval: Duration,
}

impl AuthConfig {
    /// Store-level TTL backstop for OTP records: logical expiry plus one
    /// sweep interval, so a verify between the two still reports the typed
    /// `OtpExpired` while memory stays bounded if the sweep stalls.
    #[must_use]
    pub fn otp_backstop(&self) -> Duration {
        self.otp_ttl + self.sweep_interval
    }

    /// Store-level TTL backstop for session records.
    #[must_use]
    pub fn session_backstop(&self) -> Duration {
        self.session_absolute_ttl + self.sweep_interval
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::from_secs(5 * 60),
            session_absolute_ttl: Duration::from_secs(30 * 60),
            session_inactivity_ttl: Duration::from_secs(10 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_windows() {
        let config = AuthConfig::default();
        assert_eq!(config.otp_ttl, Duration::from_secs(300));
        assert_eq!(config.session_absolute_ttl, Duration::from_secs(1800));
        assert_eq!(config.session_inactivity_ttl, Duration::from_secs(600));
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
    }

    #[test]
    fn backstops_extend_past_logical_expiry() {
        let config = AuthConfig::default();
        assert_eq!(config.otp_backstop(), Duration::from_secs(600));
        assert_eq!(config.session_backstop(), Duration::from_secs(2100));
    }
}
