//! Random material for the authentication flow.
//!
//! OTP session ids and session tokens come from the OS entropy source and
//! live in distinct store namespaces; their lengths differ as well, so one
//! can never be mistaken for the other.

use rand_core::{OsRng, RngCore};

/// Number of distinct one-time codes.
const OTP_SPACE: u32 = 1_000_000;

/// Generate a 6-digit one-time code, uniform over `000000`–`999999`.
#[must_use]
pub fn otp_code() -> String {
    // Rejection-sample to keep the distribution uniform: accept only draws
    // below the largest multiple of the code space.
    let limit = u32::MAX - u32::MAX % OTP_SPACE;
    loop {
        let draw = OsRng.next_u32();
        if draw < limit {
            return format!("{:06}", draw % OTP_SPACE);
        }
    }
}

/// Generate an opaque OTP session id (128 bits, hex).
#[must_use]
pub fn otp_session_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a session token (256 bits, hex).
#[must_use]
pub fn session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
