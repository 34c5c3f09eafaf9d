use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common_auth::Role;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::app::AppState;
use crate::store::{StoreError, User};

/// Public projection of a user record; the password hash never appears here.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.credentials.list().await.map_err(|err| {
        error!(error = %err, "Failed to list users");
        ApiError::internal()
    })?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .credentials
        .find_by_id(id)
        .await
        .map_err(|err| {
            error!(error = %err, "User lookup failed");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .credentials
        .find_by_username(&username)
        .await
        .map_err(|err| {
            error!(error = %err, "User lookup failed");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserView>, ApiError> {
    let user = state
        .credentials
        .update_role(id, request.role)
        .await
        .map_err(|err| match err {
            StoreError::NotFound => ApiError::not_found("User"),
            other => {
                error!(error = %other, "Failed to update role");
                ApiError::internal()
            }
        })?;

    info!(username = %user.username, role = %user.role, "Updated user role");
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.credentials.delete(id).await.map_err(|err| match err {
        StoreError::NotFound => ApiError::not_found("User"),
        other => {
            error!(error = %other, "Failed to delete user");
            ApiError::internal()
        }
    })?;

    info!(user_id = %id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}
