//! The portfolio document: one JSON row, versioned, edited through a
//! serialized merge service.

pub mod error;
pub mod file;
pub mod memory;
pub mod service;
pub mod store;

pub use error::DocumentError;
pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;
pub use service::DocumentService;
pub use store::{DocumentStore, StoredDocument};
