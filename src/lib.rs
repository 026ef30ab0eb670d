//! Site content service and client.
//!
//! The server half stores the site's single content document behind a small
//! REST API. The client half (`store`, `admin`) keeps a cached copy for the
//! site and the admin panel, with deep-path editing via `path`.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod path;
pub mod search;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use api::ContentEvent;
use config::Config;
use db::Repository;
use search::SearchIndex;

/// Request bodies may carry inline base64 images.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Capacity of the content event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
    pub events: broadcast::Sender<ContentEvent>,
}

impl AppState {
    pub fn new(repo: Repository, search: SearchIndex, config: Config) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repo: Arc::new(repo),
            search: Arc::new(search),
            config: Arc::new(config),
            events,
        }
    }

    /// Tell connected clients the stored document changed.
    pub fn notify_content_updated(&self) {
        // No subscribers is not an error.
        let receivers = self.events.send(ContentEvent::ContentUpdated).unwrap_or(0);
        tracing::debug!("Content update notification sent to {} subscribers", receivers);
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Content
        .route("/content", get(api::get_content).post(api::save_content))
        .route("/content/reset", post(api::reset_content))
        .route("/content/events", get(api::content_events))
        // Admin
        .route("/admin/login", post(api::login))
        // Search
        .route("/search", get(api::search_site))
        .fallback(api::api_not_found);

    // Health check
    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Site content API is running."
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
