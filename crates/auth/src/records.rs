use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_state::StateError;

use crate::error::ExpiryReason;

/// A pending one-time code, keyed in the store by its opaque session id.
///
/// Never mutated in place: re-issuing replaces the record wholesale, and a
/// successful verification deletes it (codes are single-use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(code: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// An authenticated session, keyed in the store by its token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub login_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            login_time: now,
            last_activity: now,
        }
    }

    /// Check both expiry clocks. Either alone is sufficient to kill the
    /// session; the absolute clock wins when both have fired.
    #[must_use]
    pub fn expiry(
        &self,
        now: DateTime<Utc>,
        absolute_ttl: Duration,
        inactivity_ttl: Duration,
    ) -> Option<ExpiryReason> {
        if now > self.login_time + absolute_ttl {
            return Some(ExpiryReason::Absolute);
        }
        if now > self.last_activity + inactivity_ttl {
            return Some(ExpiryReason::Inactivity);
        }
        None
    }

    /// Absolute lifetime left, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>, absolute_ttl: Duration) -> Duration {
        let elapsed = (now - self.login_time).to_std().unwrap_or_default();
        absolute_ttl.saturating_sub(elapsed)
    }
}

/// Serialize a record for storage.
pub fn encode<T: Serialize>(record: &T) -> Result<String, StateError> {
    serde_json::to_string(record).map_err(|e| StateError::Serialization(e.to_string()))
}

/// Deserialize a stored record.
pub fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, StateError> {
    serde_json::from_str(raw).map_err(|e| StateError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn otp_expiry_is_strict() {
        let now = Utc::now();
        let record = OtpRecord::new("123456".to_owned(), now, 5 * MINUTE);
        assert!(!record.is_expired(now));
        assert!(!record.is_expired(now + 5 * MINUTE));
        assert!(record.is_expired(now + 5 * MINUTE + Duration::from_secs(1)));
    }

    #[test]
    fn session_dies_on_either_clock() {
        let now = Utc::now();
        let mut record = SessionRecord::new("admin", now);

        // Fresh session is live.
        assert_eq!(record.expiry(now, 30 * MINUTE, 10 * MINUTE), None);

        // Inactivity alone kills it.
        assert_eq!(
            record.expiry(now + 11 * MINUTE, 30 * MINUTE, 10 * MINUTE),
            Some(ExpiryReason::Inactivity)
        );

        // Activity at minute 29 does not save it from the absolute clock.
        record.last_activity = now + 29 * MINUTE;
        assert_eq!(
            record.expiry(now + 31 * MINUTE, 30 * MINUTE, 10 * MINUTE),
            Some(ExpiryReason::Absolute)
        );
    }

    #[test]
    fn absolute_wins_when_both_clocks_fired() {
        let now = Utc::now();
        let record = SessionRecord::new("admin", now);
        assert_eq!(
            record.expiry(now + 45 * MINUTE, 30 * MINUTE, 10 * MINUTE),
            Some(ExpiryReason::Absolute)
        );
    }

    #[test]
    fn remaining_counts_down_from_login() {
        let now = Utc::now();
        let record = SessionRecord::new("admin", now);
        assert_eq!(record.remaining(now + 10 * MINUTE, 30 * MINUTE), 20 * MINUTE);
        assert_eq!(record.remaining(now + 40 * MINUTE, 30 * MINUTE), Duration::ZERO);
    }

    #[test]
    fn records_roundtrip_through_the_store_encoding() {
        let now = Utc::now();
        let record = SessionRecord::new("admin", now);
        let raw = encode(&record).unwrap();
        let back: SessionRecord = decode(&raw).unwrap();
        assert_eq!(back.user_id, "admin");
        assert_eq!(back.login_time, record.login_time);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode::<OtpRecord>("not json").is_err());
    }
}
