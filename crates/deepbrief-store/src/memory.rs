//! In-memory context store - tests and ephemeral deployments

use crate::{ContextStore, StoreError};
use dashmap::DashMap;
use deepbrief_core::{ContextRecord, FinalBrief, Identity};

#[derive(Default)]
pub struct MemoryContextStore {
    records: DashMap<String, ContextRecord>,
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl ContextStore for MemoryContextStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, identity: &Identity) -> Result<Option<ContextRecord>, StoreError> {
        Ok(self
            .records
            .get(identity.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, identity: &Identity, brief: &FinalBrief) -> Result<(), StoreError> {
        let record = ContextRecord::new(identity.clone(), brief.clone());
        self.records.insert(identity.as_str().to_string(), record);
        Ok(())
    }
}
