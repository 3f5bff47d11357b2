//! In-memory credential store
//!
//! Process-lifetime storage on concurrent maps. Per-key atomicity comes
//! from the map's entry locking; a secondary username index backs the
//! single-credential-per-username policy check.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{CredentialStore, StoreError};
use crate::credential::CredentialRecord;

/// DashMap-backed credential store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    /// credential id -> record
    records: DashMap<Vec<u8>, CredentialRecord>,
    /// username -> credential id
    by_username: DashMap<String, Vec<u8>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn put(&self, record: CredentialRecord) -> Result<(), StoreError> {
        // Claim the username slot before the record slot so two concurrent
        // puts for the same username cannot both land. Both locks are always
        // taken in this order.
        match self.by_username.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(user_slot) => match self.records.entry(record.credential_id.clone()) {
                Entry::Occupied(_) => Err(StoreError::Duplicate),
                Entry::Vacant(slot) => {
                    user_slot.insert(record.credential_id.clone());
                    slot.insert(record);
                    Ok(())
                }
            },
        }
    }

    async fn get(&self, credential_id: &[u8]) -> Result<CredentialRecord, StoreError> {
        self.records
            .get(credential_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::Unknown)
    }

    async fn update_sign_count(
        &self,
        credential_id: &[u8],
        new_count: u32,
    ) -> Result<(), StoreError> {
        let mut entry = self.records.get_mut(credential_id).ok_or(StoreError::Unknown)?;
        entry.sign_count = new_count;
        Ok(())
    }

    async fn username_registered(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.by_username.contains_key(username))
    }

    async fn credential_count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("records", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &[u8], username: &str, sign_count: u32) -> CredentialRecord {
        CredentialRecord {
            credential_id: id.to_vec(),
            public_key: b"pk".to_vec(),
            sign_count,
            username: username.into(),
            registered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryCredentialStore::new();
        store.put(record(b"cred-1", "alice", 0)).await.unwrap();

        let fetched = store.get(b"cred-1").await.unwrap();
        assert_eq!(fetched.username, "alice");
        assert!(store.username_registered("alice").await.unwrap());
        assert!(!store.username_registered("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_put_rejected() {
        let store = MemoryCredentialStore::new();
        store.put(record(b"cred-1", "alice", 0)).await.unwrap();

        let err = store.put(record(b"cred-1", "mallory", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        // Original record untouched
        assert_eq!(store.get(b"cred-1").await.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_second_credential_for_username_rejected() {
        let store = MemoryCredentialStore::new();
        store.put(record(b"cred-1", "alice", 0)).await.unwrap();

        // A differently-keyed record for the same username must not slip
        // past the one-credential-per-username policy.
        let err = store.put(record(b"cred-2", "alice", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.credential_count().await.unwrap(), 1);
        assert_eq!(store.get(b"cred-1").await.unwrap().username, "alice");
        assert!(matches!(store.get(b"cred-2").await, Err(StoreError::Unknown)));
    }

    #[tokio::test]
    async fn test_rejected_put_leaves_no_username_entry() {
        let store = MemoryCredentialStore::new();
        store.put(record(b"cred-1", "alice", 0)).await.unwrap();

        // Colliding credential id under a new username: the failed put must
        // not claim the username.
        let err = store.put(record(b"cred-1", "mallory", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert!(!store.username_registered("mallory").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_credential() {
        let store = MemoryCredentialStore::new();
        assert!(matches!(store.get(b"missing").await, Err(StoreError::Unknown)));
        assert!(matches!(
            store.update_sign_count(b"missing", 7).await,
            Err(StoreError::Unknown)
        ));
    }

    #[tokio::test]
    async fn test_update_sign_count() {
        let store = MemoryCredentialStore::new();
        store.put(record(b"cred-1", "alice", 5)).await.unwrap();

        store.update_sign_count(b"cred-1", 6).await.unwrap();
        assert_eq!(store.get(b"cred-1").await.unwrap().sign_count, 6);
        assert_eq!(store.credential_count().await.unwrap(), 1);
    }
}
