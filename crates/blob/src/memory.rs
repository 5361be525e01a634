use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::error::BlobError;
use crate::store::BlobStore;
use crate::types::BlobMetadata;

/// In-memory [`BlobStore`] backed by a [`DashMap`]. Intended for tests and
/// throwaway deployments; contents vanish on restart.
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    data: DashMap<String, (BlobMetadata, Bytes)>,
}

impl MemoryBlobStore {
    /// Create an empty store whose public URLs are rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            data: DashMap::new(),
        }
    }

    /// Number of blobs currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub(crate) fn checksum(data: &Bytes) -> String {
    hex::encode(Sha256::digest(data))
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobMetadata, BlobError> {
        if key.is_empty() {
            return Err(BlobError::InvalidKey(key.to_owned()));
        }
        let metadata = BlobMetadata {
            key: key.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes: data.len() as u64,
            checksum_sha256: checksum(&data),
            created_at: Utc::now(),
        };
        self.data
            .insert(key.to_owned(), (metadata.clone(), data));
        Ok(metadata)
    }

    async fn get(&self, key: &str) -> Result<Option<(BlobMetadata, Bytes)>, BlobError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/files/{key}", self.base_url.trim_end_matches('/'))
    }

    async fn remove(&self, keys: &[String]) -> u64 {
        let mut removed = 0;
        for key in keys {
            if self.data.remove(key).is_some() {
                removed += 1;
            }
        }
        removed
    }
}
