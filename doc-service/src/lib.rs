pub mod api_error;
pub mod app;
pub mod auth_handlers;
pub mod config;
pub mod document_handlers;
pub mod guard;
pub mod ingestion;
pub mod metrics;
pub mod routes;
pub mod store;
pub mod user_handlers;

pub use app::AppState;
