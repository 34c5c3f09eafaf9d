mod memory;
mod postgres;

pub use memory::{MemoryCredentialStore, MemoryDocumentStore, MemoryRevocationStore};
pub use postgres::{PgCredentialStore, PgDocumentStore, PgRevocationStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error("record not found")]
    NotFound,
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Identity record. The password hash never leaves the store layer through
/// API responses.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// A token that must no longer be honored, kept until its own expiry passes.
#[derive(Debug, Clone)]
pub struct RevokedToken {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

/// User records keyed by unique username.
///
/// Uniqueness is the store's responsibility: concurrent inserts of the same
/// username must yield exactly one success, never a check-then-insert race in
/// the callers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update_role(&self, id: Uuid, role: Role) -> Result<User, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Insert-only record of revoked tokens, checked by exact string match on
/// the hot path of every authenticated request.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    async fn insert(&self, record: RevokedToken) -> Result<(), StoreError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<RevokedToken>, StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: NewDocument) -> Result<Document, StoreError>;
    async fn list(&self) -> Result<Vec<Document>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
