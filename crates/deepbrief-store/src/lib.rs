//! Deepbrief Store - durable context records keyed by identity
//!
//! One live record per identity, last-write-wins. Absence of a record is a
//! normal outcome, not an error.

pub mod file;
pub mod memory;

pub use file::FileContextStore;
pub use memory::MemoryContextStore;

use deepbrief_core::{ContextRecord, FinalBrief, Identity};

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Context store contract: upsert on `put`, `None` for unknown identities.
#[async_trait::async_trait]
pub trait ContextStore: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, identity: &Identity) -> Result<Option<ContextRecord>, StoreError>;

    async fn put(&self, identity: &Identity, brief: &FinalBrief) -> Result<(), StoreError>;
}
