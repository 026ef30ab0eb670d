//! In-process stand-in for the remote content service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RemoteContent, StoreError};
use crate::models::{default_content_value, LoginResult, SiteContent};

/// Behaves like the content service: seeds the default on first read,
/// stores raw JSON, and checks a fixed password.
pub(crate) struct FakeRemote {
    document: Mutex<Option<Value>>,
    password: Option<String>,
    failing: AtomicBool,
}

impl FakeRemote {
    pub(crate) fn new() -> Self {
        Self::with_password(Some("abc"))
    }

    pub(crate) fn with_password(password: Option<&str>) -> Self {
        Self {
            document: Mutex::new(None),
            password: password.map(str::to_string),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every call fail as if the service were unreachable.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_document(&self, content: &SiteContent) {
        self.set_raw(serde_json::to_value(content).unwrap());
    }

    pub(crate) fn set_raw(&self, value: Value) {
        *self.document.lock().unwrap() = Some(value);
    }

    pub(crate) fn raw(&self) -> Option<Value> {
        self.document.lock().unwrap().clone()
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteContent for FakeRemote {
    async fn get_content(&self) -> Result<SiteContent, StoreError> {
        self.check_reachable()?;
        let value = self
            .document
            .lock()
            .unwrap()
            .get_or_insert_with(default_content_value)
            .clone();
        SiteContent::from_value(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn put_content(&self, content: &SiteContent) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.set_document(content);
        Ok(())
    }

    async fn reset_content(&self) -> Result<(), StoreError> {
        self.check_reachable()?;
        self.set_raw(default_content_value());
        Ok(())
    }

    async fn login(&self, password: &str) -> Result<LoginResult, StoreError> {
        self.check_reachable()?;
        Ok(match &self.password {
            None => LoginResult::failed("Server configuration error."),
            Some(expected) if expected == password => LoginResult::ok(),
            Some(_) => LoginResult::failed("Invalid credentials"),
        })
    }
}
