//! In-process key-value storage.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::ContentBackend;
use crate::errors::AppError;

/// Keeps documents in memory; contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn store(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn store_if_absent(&self, key: &str, value: &Value) -> Result<Value, AppError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .entry(key.to_string())
            .or_insert_with(|| value.clone())
            .clone())
    }
}
