use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use common_auth::{TokenCodec, TokenConfig};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use doc_service::app::AppState;
use doc_service::config::load_service_config;
use doc_service::ingestion::IngestionRegistry;
use doc_service::metrics::ServiceMetrics;
use doc_service::routes::router;
use doc_service::store::{
    CredentialStore, DocumentStore, MemoryCredentialStore, MemoryDocumentStore,
    MemoryRevocationStore, PgCredentialStore, PgDocumentStore, PgRevocationStore, RevocationStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_service_config()?;
    info!(?config, "Loaded configuration");

    let codec = Arc::new(TokenCodec::new(
        config.jwt_secret.as_bytes(),
        TokenConfig::new(config.token_ttl_seconds),
    ));

    let (credentials, revocations, documents): (
        Arc<dyn CredentialStore>,
        Arc<dyn RevocationStore>,
        Arc<dyn DocumentStore>,
    ) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("Failed to connect to Postgres")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            info!("Connected to Postgres");
            (
                Arc::new(PgCredentialStore::new(pool.clone())),
                Arc::new(PgRevocationStore::new(pool.clone())),
                Arc::new(PgDocumentStore::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory stores");
            (
                Arc::new(MemoryCredentialStore::default()),
                Arc::new(MemoryRevocationStore::default()),
                Arc::new(MemoryDocumentStore::default()),
            )
        }
    };

    let metrics = Arc::new(ServiceMetrics::new()?);
    let state = AppState {
        credentials,
        revocations,
        documents,
        ingestion: Arc::new(IngestionRegistry::default()),
        codec,
        config: Arc::new(config.clone()),
        metrics,
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid HOST/PORT combination")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "doc-service listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
