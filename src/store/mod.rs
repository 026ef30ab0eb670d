//! Client-side content store.
//!
//! Owns the cached site content for one application instance. Reads never
//! fail once past the first fetch: a failed fetch falls back to the previous
//! cache, then to the default document. Writes surface their errors.

mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpRemote;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::models::{LoginResult, SiteContent};
use crate::path::PathError;

/// The remote content service, whatever backs it.
#[async_trait]
pub trait RemoteContent: Send + Sync {
    /// Fetch the current document.
    async fn get_content(&self) -> Result<SiteContent, StoreError>;

    /// Overwrite the remote document.
    async fn put_content(&self, content: &SiteContent) -> Result<(), StoreError>;

    /// Overwrite the remote document with the default.
    async fn reset_content(&self) -> Result<(), StoreError>;

    /// Check the admin password.
    async fn login(&self, password: &str) -> Result<LoginResult, StoreError>;
}

/// Content store error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Request could not be sent or no response was received
    Network(String),
    /// The service answered with a non-success status
    Remote { status: u16, message: String },
    /// The response body was not a usable document
    Decode(String),
    /// A deep-path edit did not resolve through the document
    InvalidPath(PathError),
    /// The operation needs an authenticated admin session
    Auth(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "network error: {}", msg),
            StoreError::Remote { status, message } => {
                write!(f, "remote error ({}): {}", status, message)
            }
            StoreError::Decode(msg) => write!(f, "malformed response: {}", msg),
            StoreError::InvalidPath(err) => write!(f, "{}", err),
            StoreError::Auth(msg) => write!(f, "authentication error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<PathError> for StoreError {
    fn from(err: PathError) -> Self {
        StoreError::InvalidPath(err)
    }
}

/// Lifecycle of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing fetched yet
    Empty,
    /// First fetch in progress
    Loading,
    /// A renderable document is cached
    Ready,
}

/// Returned by successful writes: every reader must re-derive from the
/// authoritative copy, so the consuming application should reload.
#[must_use = "the application should reload after a successful write"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadRequired;

struct Inner {
    state: StoreState,
    document: Option<Arc<SiteContent>>,
}

/// Cached view of the remote site content.
pub struct ContentStore {
    remote: Arc<dyn RemoteContent>,
    inner: Mutex<Inner>,
}

impl ContentStore {
    pub fn new(remote: Arc<dyn RemoteContent>) -> Self {
        Self {
            remote,
            inner: Mutex::new(Inner {
                state: StoreState::Empty,
                document: None,
            }),
        }
    }

    pub fn state(&self) -> StoreState {
        self.lock().state
    }

    /// The cached document; `None` only before the first fetch completes.
    pub fn get(&self) -> Option<Arc<SiteContent>> {
        self.lock().document.clone()
    }

    /// The cached document, or a fresh copy of the default.
    pub fn get_or_default(&self) -> Arc<SiteContent> {
        self.get().unwrap_or_else(|| {
            tracing::warn!("Site content read before the first fetch, using default content");
            Arc::new(SiteContent::default())
        })
    }

    /// Fetch the remote document and cache it.
    ///
    /// On failure the previous cache is kept, or the default is cached if
    /// there was none.
    pub async fn fetch(&self) -> Arc<SiteContent> {
        {
            let mut inner = self.lock();
            if inner.document.is_none() {
                inner.state = StoreState::Loading;
            }
        }

        let fetched = self.remote.get_content().await;

        let mut inner = self.lock();
        inner.state = StoreState::Ready;
        match fetched {
            Ok(content) => {
                let content = Arc::new(content);
                inner.document = Some(Arc::clone(&content));
                content
            }
            Err(e) => {
                tracing::error!("Error fetching site content, using fallback: {}", e);
                Arc::clone(
                    inner
                        .document
                        .get_or_insert_with(|| Arc::new(SiteContent::default())),
                )
            }
        }
    }

    /// Overwrite the remote document; the cache follows only on success.
    pub async fn save(&self, content: SiteContent) -> Result<ReloadRequired, StoreError> {
        if let Err(e) = self.remote.put_content(&content).await {
            tracing::error!("Error saving site content: {}", e);
            return Err(e);
        }

        let mut inner = self.lock();
        inner.document = Some(Arc::new(content));
        inner.state = StoreState::Ready;
        Ok(ReloadRequired)
    }

    /// Reset the remote document to the default, then re-fetch.
    pub async fn reset(&self) -> Result<ReloadRequired, StoreError> {
        if let Err(e) = self.remote.reset_content().await {
            tracing::error!("Error resetting site content: {}", e);
            return Err(e);
        }

        self.fetch().await;
        Ok(ReloadRequired)
    }

    /// Check the admin password against the remote service.
    pub async fn login(&self, password: &str) -> Result<LoginResult, StoreError> {
        self.remote.login(password).await
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
