//! Session/OTP authentication for the folio admin panel.
//!
//! One fixed admin credential, a one-time code delivered by email, and an
//! opaque session token enforced against two independent expiry clocks
//! (absolute session age and inactivity). All state lives in an injected
//! [`folio_state::StateStore`]; a periodic sweep keeps it bounded.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod mailer;
pub mod password;
pub mod records;
pub mod sweeper;
pub mod testing;
pub mod token;

pub use authenticator::{Authenticator, OtpChallenge, SessionGrant, SessionStatus};
pub use config::{AdminCredentials, AuthConfig};
pub use error::{AuthError, ExpiryReason};
pub use mailer::{MailerError, OtpMailer};
pub use sweeper::spawn_sweeper;
