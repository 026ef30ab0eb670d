//! Integration tests for the site content service and its HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::admin::AdminSession;
use crate::config::{BackendKind, Config};
use crate::db::{init_database, ContentBackend, MemoryBackend, Repository, SqliteBackend};
use crate::models::SiteContent;
use crate::search::SearchIndex;
use crate::store::{ContentStore, HttpRemote, StoreError, StoreState};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_password(Some("abc")).await
    }

    async fn with_password(password: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::start(
            temp_dir,
            password,
            Arc::new(MemoryBackend::new()),
            BackendKind::Memory,
        )
        .await
    }

    async fn with_sqlite() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        Self::start(
            temp_dir,
            Some("abc"),
            Arc::new(SqliteBackend::new(pool)),
            BackendKind::Sqlite,
        )
        .await
    }

    async fn start(
        temp_dir: TempDir,
        password: Option<&str>,
        backend: Arc<dyn ContentBackend>,
        kind: BackendKind,
    ) -> Self {
        let db_path = temp_dir.path().join("test.sqlite");
        let index_path = temp_dir.path().join("index");

        let repo = Repository::new(backend);

        let search = SearchIndex::open(&index_path).expect("Failed to init search");
        search
            .rebuild(&SiteContent::default())
            .await
            .expect("Failed to build search index");

        let config = Config {
            master_password: password.map(str::to_string),
            backend: kind,
            db_path,
            index_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let app = create_router(AppState::new(repo, search, config));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_content(&self) -> Value {
        let resp = self
            .client
            .get(self.url("/api/content"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn login(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/admin/login"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    fn store(&self) -> Arc<ContentStore> {
        Arc::new(ContentStore::new(Arc::new(HttpRemote::new(&self.base_url))))
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let resp = fixture.client.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.text().await.unwrap(), "Site content API is running.");
}

#[tokio::test]
async fn test_first_get_seeds_default_once() {
    let fixture = TestFixture::new().await;

    let first = fixture.get_content().await;
    let second = fixture.get_content().await;

    assert_eq!(first, second);
    assert_eq!(first["services"].as_array().unwrap().len(), 10);
    assert_eq!(first["projects"].as_array().unwrap().len(), 0);
    assert_eq!(first["homepage"]["stats"]["items"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_sqlite_seeding_and_overwrite() {
    let fixture = TestFixture::with_sqlite().await;

    let seeded = fixture.get_content().await;
    assert_eq!(seeded["services"].as_array().unwrap().len(), 10);

    let mut edited = seeded.clone();
    edited["footer"]["tagline"] = json!("Stored on disk");
    let resp = fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&edited)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(fixture.get_content().await["footer"]["tagline"], "Stored on disk");
}

#[tokio::test]
async fn test_save_echoes_body_and_overwrites() {
    let fixture = TestFixture::new().await;

    // Documents are stored as-is, without schema validation.
    let doc = json!({"services": [], "custom": {"nested": [1, 2, 3]}});
    let resp = fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&doc)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed, doc);

    assert_eq!(fixture.get_content().await, doc);
}

#[tokio::test]
async fn test_save_rejects_invalid_json() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/content"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid JSON in request body.");
}

#[tokio::test]
async fn test_reset_restores_default() {
    let fixture = TestFixture::new().await;
    let default = fixture.get_content().await;

    fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&json!({"services": []}))
        .send()
        .await
        .unwrap();

    let resp = fixture
        .client
        .post(fixture.url("/api/content/reset"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, default);
    assert_eq!(fixture.get_content().await, default);
}

#[tokio::test]
async fn test_login_accepts_master_password() {
    let fixture = TestFixture::new().await;

    let resp = fixture.login(json!({"password": "abc"})).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let fixture = TestFixture::new().await;

    let resp = fixture.login(json!({"password": "wrong"})).await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_without_configured_password() {
    let fixture = TestFixture::with_password(None).await;

    let resp = fixture.login(json!({"password": "abc"})).await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server configuration error.");
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let fixture = TestFixture::new().await;

    let resp = fixture.login(json!({"pass": "abc"})).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid request body.");
}

#[tokio::test]
async fn test_unknown_api_route() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API route not found.");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_responses_are_not_cached() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/content"))
        .send()
        .await
        .unwrap();
    let cache_control = resp
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cache_control.contains("no-store"));
}

#[tokio::test]
async fn test_search_tracks_saved_content() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/search?q=mobile"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["total"].as_u64().unwrap() >= 1);
    assert_eq!(body["results"][0]["link"], "/service/mobile-apps");

    let mut content = SiteContent::default();
    content.services[0].title = "Quantum Teleportation".to_string();
    fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&content)
        .send()
        .await
        .unwrap();

    let body: Value = fixture
        .client
        .get(fixture.url("/api/search?q=quantum"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["results"][0]["title"], "Quantum Teleportation");

    let body: Value = fixture
        .client
        .get(fixture.url("/api/search?q=a"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_search_with_out_of_range_offset() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/search?q=mobile&offset=18446744073709551615"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
    assert!(body["total"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_content_events_on_save() {
    let fixture = TestFixture::new().await;

    let mut events = fixture
        .client
        .get(fixture.url("/api/content/events"))
        .send()
        .await
        .unwrap();
    assert_eq!(events.status(), 200);

    fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&json!({"services": []}))
        .send()
        .await
        .unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), async {
        let mut buffer = String::new();
        while let Some(chunk) = events.chunk().await.unwrap() {
            buffer.push_str(&String::from_utf8_lossy(&chunk));
            if buffer.contains("\n\n") {
                break;
            }
        }
        buffer
    })
    .await
    .expect("no content event received");

    assert!(received.contains("event: contentUpdated"));
    assert!(received.contains(r#"data: {"type":"contentUpdated"}"#));
}

#[tokio::test]
async fn test_store_fetch_save_round_trip() {
    let fixture = TestFixture::new().await;
    let store = fixture.store();
    assert_eq!(store.state(), StoreState::Empty);

    let fetched = store.fetch().await;
    assert_eq!(*fetched, SiteContent::default());
    assert_eq!(store.state(), StoreState::Ready);

    let mut edited = (*fetched).clone();
    edited.contact.details.email = "hello@example.com".to_string();
    let _reload = store.save(edited.clone()).await.unwrap();

    // A second application instance sees the saved document.
    let other = fixture.store();
    assert_eq!(*other.fetch().await, edited);
}

#[tokio::test]
async fn test_store_patches_legacy_document_from_service() {
    let fixture = TestFixture::new().await;

    let mut legacy = serde_json::to_value(SiteContent::default()).unwrap();
    legacy.as_object_mut().unwrap().remove("popup");
    fixture
        .client
        .post(fixture.url("/api/content"))
        .json(&legacy)
        .send()
        .await
        .unwrap();

    let fetched = fixture.store().fetch().await;
    assert!(!fetched.popup.enabled);
    assert!(fixture.get_content().await.get("popup").is_none());
}

#[tokio::test]
async fn test_store_falls_back_when_service_unreachable() {
    // Nothing listens on a freshly released port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = ContentStore::new(Arc::new(HttpRemote::new(format!("http://{}", addr))));
    let fetched = store.fetch().await;
    assert_eq!(*fetched, SiteContent::default());

    let err = store.save(SiteContent::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}

#[tokio::test]
async fn test_admin_session_over_http() {
    let fixture = TestFixture::new().await;
    let store = fixture.store();
    store.fetch().await;

    let mut session = AdminSession::new(store.clone());
    let result = session.login("wrong").await;
    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Invalid credentials"));

    assert!(session.login("abc").await.success);
    let id = session.add_service().unwrap();
    session
        .update_field("services.0.title", json!("Motion Design"))
        .unwrap();
    let _reload = session.save().await.unwrap();

    let stored = fixture.get_content().await;
    assert_eq!(stored["services"].as_array().unwrap().len(), 11);
    assert_eq!(stored["services"][0]["id"], json!(id));
    assert_eq!(stored["services"][0]["title"], "Motion Design");

    let _reload = session.reset().await.unwrap();
    assert_eq!(session.draft().unwrap().services.len(), 10);
    assert_eq!(fixture.get_content().await["services"].as_array().unwrap().len(), 10);

    session.logout();
    assert!(matches!(session.save().await, Err(StoreError::Auth(_))));
}

#[tokio::test]
async fn test_admin_login_reports_unconfigured_server() {
    let fixture = TestFixture::with_password(None).await;
    let mut session = AdminSession::new(fixture.store());

    let result = session.login("abc").await;
    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("Server configuration error."));
}
