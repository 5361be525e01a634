use thiserror::Error;

use folio_core::MergeError;

/// Errors from the document store and merge service.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A caller mistake: patching an array section, non-object items, or a
    /// section name outside the document schema.
    #[error(transparent)]
    InvalidOperation(#[from] MergeError),

    /// The named section is not part of the document schema.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// A concurrent writer changed the row between read and write.
    #[error("document was modified concurrently")]
    Conflict,

    /// The backing store failed.
    #[error("document storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
