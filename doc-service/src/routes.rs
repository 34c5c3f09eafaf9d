use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use common_auth::{AccessPolicy, Role};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::app::AppState;
use crate::guard::access_guard;
use crate::metrics::ServiceMetrics;
use crate::{auth_handlers, document_handlers, ingestion, user_handlers};

const ADMIN_ONLY: AccessPolicy = AccessPolicy::any_of(&[Role::Admin]);
const CONTENT_MANAGERS: AccessPolicy = AccessPolicy::any_of(&[Role::Admin, Role::Editor]);

/// Assemble the full service router.
///
/// Routes are grouped by access policy; each group carries the guard as a
/// route layer with its policy baked into the layer state, so the policy a
/// request is checked against is fixed at registration time.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/logout", post(auth_handlers::logout))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), AccessPolicy::PUBLIC),
            access_guard,
        ));

    let authenticated = Router::new()
        .route("/users", get(user_handlers::list_users))
        .route("/documents", get(document_handlers::list_documents))
        .route("/documents", post(document_handlers::create_document))
        .route("/documents/:id", get(document_handlers::get_document))
        .route("/ingestion", get(ingestion::list_ingestion))
        .route("/ingestion/:id", get(ingestion::get_ingestion))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), AccessPolicy::authenticated()),
            access_guard,
        ));

    let admin = Router::new()
        .route("/auth/admin-only", get(auth_handlers::admin_only))
        .route("/users", post(auth_handlers::register))
        .route("/users/:id", get(user_handlers::get_user))
        .route(
            "/users/by-name/:username",
            get(user_handlers::get_user_by_name),
        )
        .route("/users/:id/role", patch(user_handlers::update_user_role))
        .route("/users/:id", delete(user_handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), ADMIN_ONLY),
            access_guard,
        ));

    let content = Router::new()
        .route("/documents/:id", delete(document_handlers::delete_document))
        .route("/ingestion/trigger", post(ingestion::trigger_ingestion))
        .route(
            "/ingestion/:id",
            patch(ingestion::update_ingestion_status),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), CONTENT_MANAGERS),
            access_guard,
        ));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .merge(content)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics_endpoint(State(metrics): State<Arc<ServiceMetrics>>) -> Response {
    match metrics.render() {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
