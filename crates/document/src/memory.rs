use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::DocumentError;
use crate::store::{DocumentStore, StoredDocument};

/// In-memory [`DocumentStore`]. Contents vanish on restart; intended for
/// tests and throwaway deployments.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    row: RwLock<Option<StoredDocument>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self) -> Result<Option<StoredDocument>, DocumentError> {
        Ok(self.row.read().await.clone())
    }

    async fn save(
        &self,
        data: &Value,
        expected_version: Option<u64>,
    ) -> Result<u64, DocumentError> {
        let mut row = self.row.write().await;
        let current_version = row.as_ref().map(|stored| stored.version);
        if current_version != expected_version {
            return Err(DocumentError::Conflict);
        }
        let version = expected_version.unwrap_or(0) + 1;
        *row = Some(StoredDocument {
            data: data.clone(),
            version,
        });
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn load_is_none_until_first_save() {
        let store = MemoryDocumentStore::new();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_increments_version() {
        let store = MemoryDocumentStore::new();
        let v1 = store.save(&json!({"a": 1}), None).await.unwrap();
        assert_eq!(v1, 1);
        let v2 = store.save(&json!({"a": 2}), Some(1)).await.unwrap();
        assert_eq!(v2, 2);

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.data, json!({"a": 2}));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let store = MemoryDocumentStore::new();
        store.save(&json!({"a": 1}), None).await.unwrap();

        let err = store.save(&json!({"a": 2}), None).await.unwrap_err();
        assert!(matches!(err, DocumentError::Conflict));

        let err = store.save(&json!({"a": 2}), Some(7)).await.unwrap_err();
        assert!(matches!(err, DocumentError::Conflict));
    }
}
