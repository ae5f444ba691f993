#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use pomodoro_api::auth::Auth;
use pomodoro_api::config::{extract_config, ConfigV1};
use pomodoro_api::metrics::Metrics;
use pomodoro_api::routes::create_router;
use pomodoro_api::state::AppState;
use pomodoro_api::store::{DocumentStore, MemoryStore, StoreError};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: "127.0.0.1:0"
logging:
  level: "debug"
  format: "json"
store:
  type: memory
verifier:
  type: plain
  name: "Test tokens"
  tokens:
    - token: "token-u1"
      uid: "u1"
      email: "u1@example.com"
      name: "User One"
    - token: "token-u2"
      uid: "u2"
    - token: "token-expired"
      uid: "u3"
      expires_at: 0
"#;

pub fn test_config() -> ConfigV1 {
    extract_config(Figment::new().merge(Yaml::string(TEST_CONFIG))).expect("test config should parse")
}

/// Builds the real router around the given store.
pub fn build_app_with_store(store: Arc<dyn DocumentStore>) -> Router {
    let config = test_config();
    let auth = Arc::new(Auth::from_config(&config.verifier));

    create_router(AppState {
        auth,
        store,
        metrics: Metrics::new(),
    })
}

/// Builds the router on a fresh in-memory store, returned for inspection.
pub fn build_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (build_app_with_store(store.clone()), store)
}

pub fn request(method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let mut request = builder.body(body).expect("failed to build request");
    request.extensions_mut().insert(ConnectInfo(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        0,
    )));
    request
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router should respond")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// Wraps a store and counts every call made to it.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.touch();
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        self.touch();
        self.inner.set(collection, id, document).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.touch();
        self.inner.delete(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        self.touch();
        self.inner.find_by_field(collection, field, value).await
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.touch();
        self.inner.list_all(collection).await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}
