//! Content repository: seeding, overwrite and reset of the site document.

use std::sync::Arc;

use serde_json::Value;

use super::{ContentBackend, CONTENT_KEY};
use crate::errors::AppError;
use crate::models::default_content_value;

/// Repository for the single site content document.
#[derive(Clone)]
pub struct Repository {
    backend: Arc<dyn ContentBackend>,
}

impl Repository {
    pub fn new(backend: Arc<dyn ContentBackend>) -> Self {
        Self { backend }
    }

    /// Get the stored document, seeding the default on first access.
    ///
    /// Seeding is insert-if-absent under a fixed key, so repeated or
    /// concurrent first reads never create more than one document.
    pub async fn get_content(&self) -> Result<Value, AppError> {
        if let Some(content) = self.backend.load(CONTENT_KEY).await? {
            return Ok(content);
        }

        tracing::info!("No content found in storage, seeding with default content");
        self.backend
            .store_if_absent(CONTENT_KEY, &default_content_value())
            .await
    }

    /// Overwrite the stored document. Last writer wins.
    pub async fn save_content(&self, content: &Value) -> Result<(), AppError> {
        self.backend.store(CONTENT_KEY, content).await
    }

    /// Overwrite the stored document with the default and return it.
    pub async fn reset_content(&self) -> Result<Value, AppError> {
        let content = default_content_value();
        self.backend.store(CONTENT_KEY, &content).await?;
        Ok(content)
    }
}
