//! Ingestion-status stub. The real pipeline lives outside this service;
//! these endpoints only track trigger requests and reported status.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::app::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct IngestionJob {
    pub id: Uuid,
    pub status: String,
    pub triggered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct IngestionRegistry {
    jobs: Mutex<HashMap<Uuid, IngestionJob>>,
}

impl IngestionRegistry {
    pub fn trigger(&self) -> IngestionJob {
        let now = Utc::now();
        let job = IngestionJob {
            id: Uuid::new_v4(),
            status: "triggered".to_string(),
            triggered_at: now,
            updated_at: now,
        };
        let mut jobs = self.jobs.lock().expect("mutex poisoned");
        jobs.insert(job.id, job.clone());
        job
    }

    pub fn update_status(&self, id: Uuid, status: String) -> Option<IngestionJob> {
        let mut jobs = self.jobs.lock().expect("mutex poisoned");
        let job = jobs.get_mut(&id)?;
        job.status = status;
        job.updated_at = Utc::now();
        Some(job.clone())
    }

    pub fn get(&self, id: Uuid) -> Option<IngestionJob> {
        let jobs = self.jobs.lock().expect("mutex poisoned");
        jobs.get(&id).cloned()
    }

    pub fn list(&self) -> Vec<IngestionJob> {
        let jobs = self.jobs.lock().expect("mutex poisoned");
        let mut all = jobs.values().cloned().collect::<Vec<_>>();
        all.sort_by_key(|job| job.triggered_at);
        all
    }
}

pub async fn trigger_ingestion(
    State(state): State<AppState>,
) -> (StatusCode, Json<IngestionJob>) {
    let job = state.ingestion.trigger();
    info!(job_id = %job.id, "Ingestion triggered");
    (StatusCode::ACCEPTED, Json(job))
}

#[derive(Deserialize)]
pub struct UpdateIngestionRequest {
    pub status: String,
}

pub async fn update_ingestion_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIngestionRequest>,
) -> Result<Json<IngestionJob>, ApiError> {
    let job = state
        .ingestion
        .update_status(id, request.status)
        .ok_or_else(|| ApiError::not_found("Ingestion job"))?;
    info!(job_id = %job.id, status = %job.status, "Ingestion status updated");
    Ok(Json(job))
}

pub async fn get_ingestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IngestionJob>, ApiError> {
    state
        .ingestion
        .get(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Ingestion job"))
}

pub async fn list_ingestion(State(state): State<AppState>) -> Json<Vec<IngestionJob>> {
    Json(state.ingestion.list())
}
