use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tracing::warn;

use crate::error::BlobError;
use crate::memory::checksum;
use crate::store::BlobStore;
use crate::types::BlobMetadata;

/// Filesystem-backed [`BlobStore`].
///
/// Keys map to paths under `root`:
/// key `"certifications/aws.pdf"` → `{root}/certifications/aws.pdf`.
/// Parent directories are created automatically on upload. Content types
/// are stored in a `.meta` sidecar next to each blob.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| BlobError::Storage(e.to_string()))?;
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    /// Resolve a key to a filesystem path, rejecting empty keys, absolute
    /// paths, and traversal components.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() || key.starts_with('/') || key.starts_with('\\') {
            return Err(BlobError::InvalidKey(key.to_owned()));
        }
        let escapes = Path::new(key)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if escapes {
            return Err(BlobError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(key))
    }

    fn sidecar(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(".meta");
        PathBuf::from(sidecar)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobMetadata, BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?;
        tokio::fs::write(Self::sidecar(&path), content_type)
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?;

        Ok(BlobMetadata {
            key: key.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes: data.len() as u64,
            checksum_sha256: checksum(&data),
            created_at: Utc::now(),
        })
    }

    async fn get(&self, key: &str) -> Result<Option<(BlobMetadata, Bytes)>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?;
        let content_type = tokio::fs::read_to_string(Self::sidecar(&path))
            .await
            .unwrap_or_else(|_| "application/octet-stream".to_owned());

        let data = Bytes::from(data);
        let metadata = BlobMetadata {
            key: key.to_owned(),
            content_type,
            size_bytes: data.len() as u64,
            checksum_sha256: checksum(&data),
            created_at: Utc::now(),
        };
        Ok(Some((metadata, data)))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/files/{key}", self.base_url.trim_end_matches('/'))
    }

    async fn remove(&self, keys: &[String]) -> u64 {
        let mut removed = 0;
        for key in keys {
            let path = match self.resolve(key) {
                Ok(path) => path,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping blob with invalid key");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    removed += 1;
                    // The sidecar is optional; ignore failures.
                    let _ = tokio::fs::remove_file(Self::sidecar(&path)).await;
                }
                Err(e) => warn!(key = %key, error = %e, "failed to remove blob"),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path(), "http://localhost:8080").unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn upload_creates_nested_directories() {
        let (_dir, store) = test_store();
        store
            .upload("a/b/c.txt", Bytes::from_static(b"deep"), "text/plain")
            .await
            .unwrap();

        let (meta, data) = store.get("a/b/c.txt").await.unwrap().unwrap();
        assert_eq!(meta.content_type, "text/plain");
        assert_eq!(data, Bytes::from_static(b"deep"));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (_dir, store) = test_store();
        assert!(store.get("nope.bin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, store) = test_store();
        for key in ["../escape", "/absolute", "a/../../b", ""] {
            let err = store
                .upload(key, Bytes::from_static(b"x"), "text/plain")
                .await
                .unwrap_err();
            assert!(matches!(err, BlobError::InvalidKey(_)), "key: {key:?}");
        }
    }

    #[tokio::test]
    async fn remove_deletes_file_and_sidecar() {
        let (dir, store) = test_store();
        store
            .upload("gone.txt", Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();

        let removed = store.remove(&["gone.txt".to_owned()]).await;
        assert_eq!(removed, 1);
        assert!(!dir.path().join("gone.txt").exists());
        assert!(!dir.path().join("gone.txt.meta").exists());

        // Removing again is a silent no-op.
        let removed = store.remove(&["gone.txt".to_owned()]).await;
        assert_eq!(removed, 0);
    }
}
