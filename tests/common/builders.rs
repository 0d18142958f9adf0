//! Test builders — an in-process app plus request/response helpers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use capjobs::state::AppState;
use capjobs_core::Config;
use tower::ServiceExt;

use super::fake_store::FakeStore;

/// Peer address used when a test does not care who is calling.
pub const DEFAULT_CLIENT: &str = "10.0.0.1:40000";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Config as the binary would load it, with `keywords` as `VALID_KEYWORDS`.
pub fn test_config(keywords: &str) -> Config {
    Config::from_env_map([
        ("DUMP_DB_URI", "mongodb://127.0.0.1:27017"),
        ("DUMP_DB_NAME", "jobs_test"),
        ("VALID_KEYWORDS", keywords),
    ])
    .expect("test config must be valid")
}

// ---------------------------------------------------------------------------
// TestApp
// ---------------------------------------------------------------------------

/// Router wired to a [`FakeStore`], with the store kept reachable for
/// assertions.
pub struct TestApp {
    router: Router,
    pub store: Arc<FakeStore>,
}

impl TestApp {
    /// App over `store` with the given keyword list and default settings.
    pub fn new(keywords: &str, store: FakeStore) -> Self {
        Self::with_config(test_config(keywords), store)
    }

    /// App over `store` serving `index` on `/`.
    pub fn with_index(keywords: &str, store: FakeStore, index: &Path) -> Self {
        let mut config = test_config(keywords);
        config.server.index_html = index.to_path_buf();
        Self::with_config(config, store)
    }

    pub fn with_config(config: Config, store: FakeStore) -> Self {
        let store = Arc::new(store);
        let state = AppState::new(&config, store.clone());
        Self {
            router: capjobs::router(state),
            store,
        }
    }

    /// `GET uri` from [`DEFAULT_CLIENT`].
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.get_from(uri, DEFAULT_CLIENT).await
    }

    /// `GET uri` as if the connection came from `client` (`ip:port`).
    pub async fn get_from(&self, uri: &str, client: &str) -> TestResponse {
        let addr: SocketAddr = client.parse().expect("client must be ip:port");
        let request = Request::builder()
            .uri(uri)
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .expect("request must build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// TestResponse
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({e}): {:?}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `detail` field of a JSON error body.
    pub fn detail(&self) -> String {
        match self.json().get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            other => panic!("error body has no string detail: {other:?}"),
        }
    }
}
