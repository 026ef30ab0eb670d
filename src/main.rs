//! Site content service.
//!
//! Serves the site content document over REST with SQLite (or in-memory)
//! persistence and Tantivy site search.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use site_content::config::Config;
use site_content::db::{self, Repository};
use site_content::models::SiteContent;
use site_content::search::SearchIndex;
use site_content::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting site content service");
    tracing::info!("Backend: {:?}", config.backend);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.master_password.is_none() {
        tracing::warn!("No master password configured (SITE_MASTER_PASSWORD). Admin login will fail!");
    }

    // Initialize storage
    let backend = db::open_backend(&config).await?;
    let repo = Repository::new(backend);

    // Initialize search index from the current (possibly freshly seeded) content
    let search = SearchIndex::open(&config.index_path)?;
    tracing::info!("Building search index...");
    match SiteContent::from_value(repo.get_content().await?) {
        Ok(content) => search.rebuild(&content).await?,
        Err(e) => tracing::warn!("Stored content does not match the site schema, search index left empty: {}", e),
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(repo, search, config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
