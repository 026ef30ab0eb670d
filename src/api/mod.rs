//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod admin;
mod content;
mod events;
mod search;

pub use admin::*;
pub use content::*;
pub use events::*;
pub use search::*;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::SiteContent;
use crate::AppState;

/// Fallback for unknown `/api/*` routes.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("API route not found.".to_string())
}

/// Refresh the search index after the stored document changed.
///
/// Stored documents are not schema-checked, so one that no longer parses as
/// site content leaves the previous index in place.
async fn reindex(state: &AppState, content: &Value) {
    match SiteContent::from_value(content.clone()) {
        Ok(site) => {
            if let Err(e) = state.search.rebuild(&site).await {
                tracing::warn!("Failed to rebuild search index: {}", e);
            }
        }
        Err(e) => tracing::warn!("Stored content does not match the site schema, index not rebuilt: {}", e),
    }
}
