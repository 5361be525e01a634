use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument};

use folio_state::{KeyKind, StateKey, StateStore};

use crate::config::{AdminCredentials, AuthConfig};
use crate::error::AuthError;
use crate::mailer::OtpMailer;
use crate::password::{verify_password, verify_username};
use crate::records::{OtpRecord, SessionRecord, decode, encode};
use crate::token;

/// Result of a successful credential check: a pending OTP challenge.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    /// Opaque id the client echoes back together with the code.
    pub session_id: String,
    /// How long the code stays verifiable.
    pub expires_in: Duration,
}

/// Result of a successful OTP verification: an authenticated session.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: String,
    /// Absolute session lifetime.
    pub expires_in: Duration,
}

/// Result of validating a live session.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub user_id: String,
    /// Absolute lifetime left.
    pub remaining: Duration,
}

/// The session/OTP state machine:
/// `ANONYMOUS → OTP_PENDING → AUTHENTICATED → (EXPIRED | LOGGED_OUT)`.
///
/// Stateless between calls except for the injected store; safe to share
/// behind an `Arc` across request handlers and the background sweep.
pub struct Authenticator {
    credentials: AdminCredentials,
    config: AuthConfig,
    store: Arc<dyn StateStore>,
    mailer: Arc<dyn OtpMailer>,
}

impl Authenticator {
    pub fn new(
        credentials: AdminCredentials,
        config: AuthConfig,
        store: Arc<dyn StateStore>,
        mailer: Arc<dyn OtpMailer>,
    ) -> Self {
        Self {
            credentials,
            config,
            store,
            mailer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn otp_key(session_id: &str) -> StateKey {
        StateKey::new(KeyKind::Otp, session_id)
    }

    fn session_key(token: &str) -> StateKey {
        StateKey::new(KeyKind::Session, token)
    }

    /// Check the admin credential and issue a one-time code.
    ///
    /// The code is dispatched by email before anything is stored: a record
    /// exists only for codes the admin can actually receive. The response
    /// never reveals which credential field was wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, user_id: &str, password: &str) -> Result<OtpChallenge, AuthError> {
        if user_id.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        // Evaluate both checks unconditionally; bail only after.
        let user_ok = verify_username(&self.credentials.username, user_id);
        let password_ok = verify_password(self.credentials.password_hash.expose_secret(), password);
        if !user_ok || !password_ok {
            debug!("credential check failed");
            return Err(AuthError::InvalidCredentials);
        }

        let code = token::otp_code();
        let session_id = token::otp_session_id();

        self.mailer.send_otp(&self.credentials.email, &code).await?;

        let record = OtpRecord::new(code, Utc::now(), self.config.otp_ttl);
        self.store
            .set(
                &Self::otp_key(&session_id),
                &encode(&record)?,
                Some(self.config.otp_backstop()),
            )
            .await?;

        info!("one-time code issued");
        Ok(OtpChallenge {
            session_id,
            expires_in: self.config.otp_ttl,
        })
    }

    /// Exchange a verified one-time code for a session token.
    #[instrument(skip_all)]
    pub async fn verify_otp(&self, session_id: &str, code: &str) -> Result<SessionGrant, AuthError> {
        let key = Self::otp_key(session_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Err(AuthError::SessionNotFound);
        };
        let record: OtpRecord = decode(&raw)?;

        let now = Utc::now();
        if record.is_expired(now) {
            // Expired codes are not retryable; drop the record now rather
            // than waiting for the sweep.
            self.store.delete(&key).await?;
            return Err(AuthError::OtpExpired);
        }
        if record.code != code {
            // Record retained: the admin may re-type until expiry.
            return Err(AuthError::OtpMismatch);
        }

        // Single-use: the first verifier to win the delete gets the
        // session; a concurrent verifier sees the record as already gone.
        if !self.store.delete(&key).await? {
            return Err(AuthError::SessionNotFound);
        }

        let session_token = token::session_token();
        let session = SessionRecord::new(self.credentials.username.clone(), now);
        self.store
            .set(
                &Self::session_key(&session_token),
                &encode(&session)?,
                Some(self.config.session_backstop()),
            )
            .await?;

        info!("session established");
        Ok(SessionGrant {
            token: session_token,
            expires_in: self.config.session_absolute_ttl,
        })
    }

    /// Validate a session token and bump its activity clock.
    #[instrument(skip_all)]
    pub async fn validate_session(&self, session_token: &str) -> Result<SessionStatus, AuthError> {
        let key = Self::session_key(session_token);
        let Some(raw) = self.store.get(&key).await? else {
            return Err(AuthError::SessionNotFound);
        };
        let mut record: SessionRecord = decode(&raw)?;

        let now = Utc::now();
        if let Some(reason) = record.expiry(
            now,
            self.config.session_absolute_ttl,
            self.config.session_inactivity_ttl,
        ) {
            self.store.delete(&key).await?;
            debug!(%reason, "session expired");
            return Err(AuthError::SessionExpired { reason });
        }

        record.last_activity = now;
        self.store
            .set(&key, &encode(&record)?, Some(self.config.session_backstop()))
            .await?;

        Ok(SessionStatus {
            remaining: record.remaining(now, self.config.session_absolute_ttl),
            user_id: record.user_id,
        })
    }

    /// Terminate a session. Idempotent: returns `Ok` whether or not the
    /// record still existed, so clients never need to distinguish "already
    /// gone" from "removed".
    #[instrument(skip_all)]
    pub async fn logout(&self, session_token: &str) -> Result<(), AuthError> {
        let existed = self.store.delete(&Self::session_key(session_token)).await?;
        if existed {
            info!("session terminated");
        }
        Ok(())
    }

    /// Remove every OTP and session record past its own expiry rules.
    ///
    /// Returns the number of records removed. Corrupt records count as
    /// dead. Runs against the same concurrent store the request handlers
    /// use, so a sweep racing a validate resolves through the store's
    /// delete semantics.
    pub async fn sweep_expired(&self) -> Result<u64, AuthError> {
        let now = Utc::now();
        let mut removed = 0;

        for (id, raw) in self.store.scan_kind(&KeyKind::Otp).await? {
            let dead = decode::<OtpRecord>(&raw)
                .map(|record| record.is_expired(now))
                .unwrap_or(true);
            if dead && self.store.delete(&Self::otp_key(&id)).await? {
                removed += 1;
            }
        }

        for (id, raw) in self.store.scan_kind(&KeyKind::Session).await? {
            let dead = decode::<SessionRecord>(&raw)
                .map(|record| {
                    record
                        .expiry(
                            now,
                            self.config.session_absolute_ttl,
                            self.config.session_inactivity_ttl,
                        )
                        .is_some()
                })
                .unwrap_or(true);
            if dead && self.store.delete(&Self::session_key(&id)).await? {
                removed += 1;
            }
        }

        Ok(removed)
    }
}
