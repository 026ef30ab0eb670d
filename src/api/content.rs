//! Content API endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::reindex;
use crate::errors::AppError;
use crate::AppState;

/// GET /api/content - Get the site content, seeding the default on first access.
pub async fn get_content(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let content = state.repo.get_content().await?;
    Ok(Json(content))
}

/// POST /api/content - Overwrite the site content and echo it back.
pub async fn save_content(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(content) = payload.map_err(|e| {
        tracing::warn!("Rejected content update: {}", e);
        AppError::BadRequest("Invalid JSON in request body.".to_string())
    })?;

    state.repo.save_content(&content).await?;
    tracing::info!("Content updated");

    reindex(&state, &content).await;
    state.notify_content_updated();

    Ok(Json(content))
}

/// POST /api/content/reset - Overwrite the site content with the default.
pub async fn reset_content(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let content = state.repo.reset_content().await?;
    tracing::info!("Content reset to default");

    reindex(&state, &content).await;
    state.notify_content_updated();

    Ok(Json(content))
}
