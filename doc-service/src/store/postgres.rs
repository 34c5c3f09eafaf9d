use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_auth::Role;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{
    CredentialStore, Document, DocumentStore, NewDocument, NewUser, RevocationStore, RevokedToken,
    StoreError, User,
};

const PG_UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return StoreError::DuplicateUsername;
            }
        }
        StoreError::Backend(err.to_string())
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, StoreError> {
        let role = Role::from_str(&self.role).map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role,
        })
    }
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        // Exact-match equality; pattern characters in the input carry no
        // special meaning here.
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // The unique constraint on username arbitrates concurrent inserts.
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, username, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, role",
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.into_user()
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET role = $1 WHERE id = $2
             RETURNING id, username, password_hash, role",
        )
        .bind(role.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound)?.into_user()
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(FromRow)]
struct RevokedTokenRow {
    token: String,
    revoked_at: DateTime<Utc>,
    expiry: DateTime<Utc>,
}

impl From<RevokedTokenRow> for RevokedToken {
    fn from(row: RevokedTokenRow) -> Self {
        Self {
            token: row.token,
            revoked_at: row.revoked_at,
            expiry: row.expiry,
        }
    }
}

#[derive(Clone)]
pub struct PgRevocationStore {
    pool: PgPool,
}

impl PgRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for PgRevocationStore {
    async fn insert(&self, record: RevokedToken) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO revoked_tokens (token, revoked_at, expiry) VALUES ($1, $2, $3)")
            .bind(record.token)
            .bind(record.revoked_at)
            .bind(record.expiry)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RevokedToken>, StoreError> {
        // Duplicate rows from concurrent logouts are harmless; any match
        // makes the token unusable.
        let row = sqlx::query_as::<_, RevokedTokenRow>(
            "SELECT token, revoked_at, expiry FROM revoked_tokens WHERE token = $1 LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RevokedToken::from))
    }
}

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: NewDocument) -> Result<Document, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (id, title, content)
             VALUES ($1, $2, $3)
             RETURNING id, title, content, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(document.title)
        .bind(document.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, title, content, created_at, updated_at FROM documents ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, title, content, created_at, updated_at FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Document::from))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
