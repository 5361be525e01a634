//! Volatile key-value storage for authentication state.
//!
//! The authenticator keeps OTP and session records in a [`StateStore`]
//! constructed once per process and passed by handle: there is no hidden
//! process-wide singleton, and a distributed cache can be substituted later
//! without touching the authenticator logic.

pub mod error;
pub mod key;
pub mod store;
pub mod testing;

pub use error::StateError;
pub use key::{KeyKind, StateKey};
pub use store::StateStore;
