use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use narrata_api::busy::BusySet;
use narrata_api::config::ServerConfig;
use narrata_api::router::build_app_router;
use narrata_api::state::AppState;
use narrata_lexicon::LexiconClient;
use narrata_pipeline::PipelineClient;
use narrata_storage::{BackoffConfig, BackoffLister, MemoryObjectStore, ObjectStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// External endpoints point at `127.0.0.1:1`, which refuses connections
/// immediately, so tests exercising upstream-failure paths are
/// deterministic.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        pipeline_url: "http://127.0.0.1:1".to_string(),
        storage_bucket: "test-bucket".to_string(),
        dictionary_url: "http://127.0.0.1:1".to_string(),
        master_dictionary_id: "master".to_string(),
        validation_chunk_limit: 5,
    }
}

/// Build the full application router using an in-memory object store.
#[allow(dead_code)]
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool, Arc::new(MemoryObjectStore::new()))
}

/// Build the full application router with the production middleware stack,
/// using the given database pool and object store.
pub fn build_test_app_with_store(pool: PgPool, store: Arc<MemoryObjectStore>) -> Router {
    let config = test_config();

    let store: Arc<dyn ObjectStore> = store;
    let lister = Arc::new(BackoffLister::new(
        Arc::clone(&store),
        BackoffConfig::default(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
        lister,
        pipeline: Arc::new(PipelineClient::new(config.pipeline_url.clone())),
        lexicon: Arc::new(LexiconClient::new(
            config.dictionary_url.clone(),
            config.master_dictionary_id.clone(),
        )),
        busy: Arc::new(BusySet::new()),
        watcher_cancel: tokio_util::sync::CancellationToken::new(),
    };

    build_app_router(state, &config)
}

/// Send a GET request and return the response.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a request with a JSON body and return the response.
#[allow(dead_code)]
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request and return the response.
#[allow(dead_code)]
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into a JSON value.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
