use crate::store::error::StoreError;
use crate::store::record_store::RecordStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A [`RecordStore`] kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, document: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document.to_string());
        Ok(())
    }
}
