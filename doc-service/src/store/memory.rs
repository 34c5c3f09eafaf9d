use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use common_auth::Role;
use uuid::Uuid;

use super::{
    CredentialStore, Document, DocumentStore, NewDocument, NewUser, RevocationStore, RevokedToken,
    StoreError, User,
};

/// In-memory credential store for development and tests. Username uniqueness
/// is enforced under the map lock, matching the database's atomic constraint.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("mutex poisoned");
        Ok(users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("mutex poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.lock().expect("mutex poisoned");
        let mut all = users.values().cloned().collect::<Vec<_>>();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("mutex poisoned");
        if users.values().any(|existing| existing.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("mutex poisoned");
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.lock().expect("mutex poisoned");
        users.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryRevocationStore {
    records: Mutex<HashMap<String, RevokedToken>>,
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn insert(&self, record: RevokedToken) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("mutex poisoned");
        records.entry(record.token.clone()).or_insert(record);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RevokedToken>, StoreError> {
        let records = self.records.lock().expect("mutex poisoned");
        Ok(records.get(token).cloned())
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<Uuid, Document>>,
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, document: NewDocument) -> Result<Document, StoreError> {
        let now = chrono::Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            title: document.title,
            content: document.content,
            created_at: now,
            updated_at: now,
        };
        let mut documents = self.documents.lock().expect("mutex poisoned");
        documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn list(&self) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.lock().expect("mutex poisoned");
        let mut all = documents.values().cloned().collect::<Vec<_>>();
        all.sort_by_key(|doc| doc.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.lock().expect("mutex poisoned");
        Ok(documents.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("mutex poisoned");
        documents.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryCredentialStore::default();
        store.insert(new_user("alice", Role::Admin)).await.unwrap();
        let err = store
            .insert(new_user("alice", Role::Viewer))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn username_lookup_is_exact_match() {
        let store = MemoryCredentialStore::default();
        store.insert(new_user("alice", Role::Admin)).await.unwrap();
        assert!(store.find_by_username("alice").await.unwrap().is_some());
        assert!(store.find_by_username("ali%").await.unwrap().is_none());
        assert!(store.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_role_and_delete_report_missing_users() {
        let store = MemoryCredentialStore::default();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.update_role(missing, Role::Editor).await.unwrap_err(),
            StoreError::NotFound
        ));
        assert!(matches!(
            store.delete(missing).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn revocation_round_trip_and_idempotent_insert() {
        let store = MemoryRevocationStore::default();
        let record = RevokedToken {
            token: "abc.def.ghi".to_string(),
            revoked_at: Utc::now(),
            expiry: Utc::now() + Duration::hours(1),
        };
        assert!(store.find_by_token("abc.def.ghi").await.unwrap().is_none());
        store.insert(record.clone()).await.unwrap();
        store.insert(record).await.unwrap();
        assert!(store.find_by_token("abc.def.ghi").await.unwrap().is_some());
    }
}
