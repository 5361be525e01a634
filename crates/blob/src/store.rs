use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;
use crate::types::BlobMetadata;

/// Pluggable storage backend for uploaded files.
///
/// Implementors provide the actual storage mechanism (filesystem, memory,
/// an object store). Keys are caller-chosen, slash-separated paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob under `key`, overwriting any existing content (upsert).
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobMetadata, BlobError>;

    /// Retrieve a blob's metadata and content. `None` if it does not exist.
    async fn get(&self, key: &str) -> Result<Option<(BlobMetadata, Bytes)>, BlobError>;

    /// The public URL a browser can fetch this key from.
    fn public_url(&self, key: &str) -> String;

    /// Remove the given keys, best-effort.
    ///
    /// Individual failures are logged by the implementation and never
    /// surfaced; the returned count is the number actually removed.
    async fn remove(&self, keys: &[String]) -> u64;
}
