//! In-process record store
//!
//! Keeps everything in hash maps behind a single lock. Data lives as long as
//! the process; useful for local runs without PostgreSQL and for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{NewUser, OvertimeRecord, RecordDraft, RecordKey, User};

#[derive(Default)]
struct MemoryState {
    users: HashMap<String, User>,
    records: HashMap<RecordKey, OvertimeRecord>,
}

/// Record store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_user(&self, id: &str) -> StoreResult<User> {
        self.state
            .read()
            .await
            .users
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };

        self.state
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn find_record(&self, key: &RecordKey) -> StoreResult<OvertimeRecord> {
        self.state
            .read()
            .await
            .records
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn save_record(&self, draft: &RecordDraft) -> StoreResult<OvertimeRecord> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let record = match draft.id {
            Some(id) => state
                .records
                .values_mut()
                .find(|record| record.id == id)
                .ok_or(StoreError::NotFound)?,
            None => state
                .records
                .entry(draft.key.clone())
                .or_insert_with(|| OvertimeRecord {
                    id: Uuid::new_v4(),
                    user_id: draft.key.user_id.clone(),
                    year: draft.key.year,
                    month: draft.key.month,
                    entries: Vec::new(),
                    salary: 0.0,
                    created_at: now,
                    updated_at: now,
                }),
        };

        record.entries = draft.entries.clone();
        record.salary = draft.salary;
        record.updated_at = now;

        Ok(record.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OvertimeEntry;
    use std::time::Duration;

    fn entry(date: &str) -> OvertimeEntry {
        OvertimeEntry {
            date: date.to_string(),
            start_time: "18:00".to_string(),
            end_time: "20:00".to_string(),
            overtime_hours: 2.0,
            overtime_pay: 500.0,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = MemoryRecordStore::new();
        let created = store
            .create_user(&NewUser {
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        let found = store.find_user(&created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_missing_entities_are_not_found() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            store.find_user("nobody").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.find_record(&RecordKey::new("u1", 2024, 4)).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_insert_then_update_by_id() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::new("u1", 2024, 3);

        let inserted = store
            .save_record(&RecordDraft::new(key.clone(), vec![entry("2024-03-01")], 100.0))
            .await
            .unwrap();
        assert_eq!(inserted.created_at, inserted.updated_at);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let updated = store
            .save_record(&inserted.clone().revise(vec![entry("2024-03-02")], 200.0))
            .await
            .unwrap();

        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.created_at, inserted.created_at);
        assert!(updated.updated_at > inserted.updated_at);
        assert_eq!(updated.entries, vec![entry("2024-03-02")]);
        assert_eq!(updated.salary, 200.0);
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_insert_for_existing_key_overwrites() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::new("u1", 2024, 3);

        let first = store
            .save_record(&RecordDraft::new(key.clone(), vec![entry("2024-03-01")], 1.0))
            .await
            .unwrap();
        let second = store
            .save_record(&RecordDraft::new(key.clone(), vec![], 2.0))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.entries.is_empty());
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_saves_keep_one_record() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::new("u1", 2024, 3);
        let first = RecordDraft::new(key.clone(), vec![entry("2024-03-01")], 1.0);
        let second = RecordDraft::new(key.clone(), vec![entry("2024-03-02")], 2.0);

        let (a, b) = tokio::join!(store.save_record(&first), store.save_record(&second));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(store.record_count().await, 1);
        let stored = store.find_record(&key).await.unwrap();
        assert!(stored == a || stored == b);
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let store = MemoryRecordStore::new();
        let draft = RecordDraft {
            id: Some(Uuid::new_v4()),
            key: RecordKey::new("u1", 2024, 3),
            entries: vec![],
            salary: 0.0,
        };

        assert!(matches!(
            store.save_record(&draft).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.record_count().await, 0);
    }
}
