//! Upsert and lookup logic for monthly overtime records and users

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::models::{
    NewUser, OvertimeEntry, OvertimeRecord, RecordDraft, RecordKey, SaveRecordResponse, User,
};
use crate::password::hash_password;
use crate::store::{RecordStore, StoreError, StoreResult};

/// Error type for service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The store failed to read or persist
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The password could not be hashed
    #[error("Failed to hash password: {0}")]
    Credentials(String),
}

/// Type alias for Result with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business operations over a [`RecordStore`]
#[derive(Clone)]
pub struct OvertimeService {
    store: Arc<dyn RecordStore>,
}

impl OvertimeService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Fetch the record stored under `key`, or `None` when there is none
    pub async fn get_record(&self, key: &RecordKey) -> ServiceResult<Option<OvertimeRecord>> {
        Ok(found(self.store.find_record(key).await)?)
    }

    /// Create or replace the record stored under `key`.
    ///
    /// The entry list is replaced wholesale. This is a read followed by a
    /// write without a lock: concurrent saves for the same key resolve to
    /// whichever write lands last.
    pub async fn save_record(
        &self,
        key: RecordKey,
        entries: Vec<OvertimeEntry>,
        salary: f64,
    ) -> ServiceResult<SaveRecordResponse> {
        let draft = match found(self.store.find_record(&key).await)? {
            Some(existing) => existing.revise(entries, salary),
            None => RecordDraft::new(key, entries, salary),
        };
        let created = draft.id.is_none();

        let record = self.store.save_record(&draft).await?;
        info!(
            record_id = %record.id,
            user_id = %record.user_id,
            year = record.year,
            month = record.month,
            entries = record.entries.len(),
            created,
            "Overtime record saved"
        );

        Ok(SaveRecordResponse::saved())
    }

    /// Fetch a user by identifier, or `None` when there is none
    pub async fn get_user(&self, id: &str) -> ServiceResult<Option<User>> {
        Ok(found(self.store.find_user(id).await)?)
    }

    /// Create a user; the password is stored as an Argon2 hash
    pub async fn create_user(&self, username: &str, password: &str) -> ServiceResult<User> {
        let password_hash =
            hash_password(password).map_err(|e| ServiceError::Credentials(e.to_string()))?;

        let user = self
            .store
            .create_user(&NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Check that the underlying store is reachable
    pub async fn ping(&self) -> ServiceResult<()> {
        Ok(self.store.ping().await?)
    }
}

fn found<T>(result: StoreResult<T>) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
