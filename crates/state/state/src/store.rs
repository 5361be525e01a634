use std::time::Duration;

use async_trait::async_trait;

use crate::error::StateError;
use crate::key::{KeyKind, StateKey};

/// Trait for persisting volatile authentication state.
///
/// Implementations must be `Send + Sync` and safe for concurrent access:
/// request handlers and the background sweep share one store, and two
/// callers racing to delete the same key must observe exactly one `true`.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the value for a key. Returns `None` if not found or expired.
    async fn get(&self, key: &StateKey) -> Result<Option<String>, StateError>;

    /// Set a value with an optional TTL, overwriting any previous value.
    async fn set(
        &self,
        key: &StateKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StateError>;

    /// Delete a key. Returns `true` if a live entry existed.
    async fn delete(&self, key: &StateKey) -> Result<bool, StateError>;

    /// List all live `(id, value)` pairs of a given kind.
    ///
    /// Used by the expiry sweep; the result is a snapshot, not a cursor.
    async fn scan_kind(&self, kind: &KeyKind) -> Result<Vec<(String, String)>, StateError>;
}
