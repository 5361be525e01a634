use async_trait::async_trait;
use serde_json::Value;

use crate::error::DocumentError;

/// The stored row: the document plus its write version.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub data: Value,
    pub version: u64,
}

/// Storage for the singleton portfolio document.
///
/// The store holds exactly one logical row of opaque JSON; no schema is
/// enforced here. Every save is a conditional update: the caller passes the
/// version it read (or `None` when creating), and a mismatch fails with
/// [`DocumentError::Conflict`] instead of silently dropping the other
/// writer's data.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the row. `None` if no document has ever been saved.
    async fn load(&self) -> Result<Option<StoredDocument>, DocumentError>;

    /// Save the row if its current version matches `expected_version`.
    /// Returns the new version.
    async fn save(&self, data: &Value, expected_version: Option<u64>)
    -> Result<u64, DocumentError>;
}
