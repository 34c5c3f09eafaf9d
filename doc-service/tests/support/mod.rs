#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use common_auth::{TokenCodec, TokenConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use doc_service::app::AppState;
use doc_service::config::ServiceConfig;
use doc_service::ingestion::IngestionRegistry;
use doc_service::metrics::ServiceMetrics;
use doc_service::routes::router;
use doc_service::store::{MemoryCredentialStore, MemoryDocumentStore, MemoryRevocationStore};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        jwt_secret: String::from_utf8_lossy(TEST_SECRET).into_owned(),
        token_ttl_seconds: 3600,
        database_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn test_app() -> Router {
    let config = test_config();
    let codec = Arc::new(TokenCodec::new(
        TEST_SECRET,
        TokenConfig::new(config.token_ttl_seconds),
    ));
    let state = AppState {
        credentials: Arc::new(MemoryCredentialStore::default()),
        revocations: Arc::new(MemoryRevocationStore::default()),
        documents: Arc::new(MemoryDocumentStore::default()),
        ingestion: Arc::new(IngestionRegistry::default()),
        codec,
        config: Arc::new(config),
        metrics: Arc::new(ServiceMetrics::new().expect("metrics")),
    };
    router(state)
}

/// Codec sharing the test secret; a negative ttl mints already-expired
/// tokens with a valid signature.
pub fn forging_codec(ttl_seconds: i64) -> TokenCodec {
    TokenCodec::new(TEST_SECRET, TokenConfig::new(ttl_seconds))
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("infallible")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn register(app: &Router, username: &str, password: &str, role: &str) {
    let response = send(
        app,
        request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "username": username, "password": password, "role": role })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    body["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}
