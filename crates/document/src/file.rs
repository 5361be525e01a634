use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::DocumentError;
use crate::store::{DocumentStore, StoredDocument};

/// On-disk row envelope: the document plus its version counter.
#[derive(Debug, Serialize, Deserialize)]
struct FileRow {
    version: u64,
    data: Value,
}

/// File-backed [`DocumentStore`] persisting the row as one JSON file.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a torn document. An internal mutex keeps
/// the version check and the rename atomic with respect to each other.
#[derive(Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    async fn read_row(&self) -> Result<Option<FileRow>, DocumentError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DocumentError::Storage(e.to_string())),
        };
        let row = serde_json::from_str(&raw)
            .map_err(|e| DocumentError::Serialization(e.to_string()))?;
        Ok(Some(row))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load(&self) -> Result<Option<StoredDocument>, DocumentError> {
        let _guard = self.io_lock.lock().await;
        Ok(self.read_row().await?.map(|row| StoredDocument {
            data: row.data,
            version: row.version,
        }))
    }

    async fn save(
        &self,
        data: &Value,
        expected_version: Option<u64>,
    ) -> Result<u64, DocumentError> {
        let _guard = self.io_lock.lock().await;

        let current_version = self.read_row().await?.map(|row| row.version);
        if current_version != expected_version {
            return Err(DocumentError::Conflict);
        }

        let version = expected_version.unwrap_or(0) + 1;
        let row = FileRow {
            version,
            data: data.clone(),
        };
        let raw = serde_json::to_string_pretty(&row)
            .map_err(|e| DocumentError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DocumentError::Storage(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .map_err(|e| DocumentError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DocumentError::Storage(e.to_string()))?;

        Ok(version)
    }
}
