use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::TokenCodec;

use crate::config::ServiceConfig;
use crate::ingestion::IngestionRegistry;
use crate::metrics::ServiceMetrics;
use crate::store::{CredentialStore, DocumentStore, RevocationStore};

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub revocations: Arc<dyn RevocationStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub ingestion: Arc<IngestionRegistry>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<ServiceConfig>,
    pub metrics: Arc<ServiceMetrics>,
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
