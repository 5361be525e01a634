use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// Storage key, e.g. `"certifications/aws-saa.pdf"`.
    pub key: String,
    /// MIME content type (e.g. `"application/pdf"`).
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// `SHA-256` hex digest of the blob content.
    pub checksum_sha256: String,
    /// When the blob was stored.
    pub created_at: DateTime<Utc>,
}
