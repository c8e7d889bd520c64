//! Persistence of users and overtime records
//!
//! Handlers and the service only see the [`RecordStore`] trait; the binary
//! decides at startup which backend sits behind it.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, OvertimeRecord, RecordDraft, RecordKey, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No entity matches the requested key
    #[error("Entity not found")]
    NotFound,

    /// Connectivity, query or row decoding failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage of users and overtime records keyed by their natural keys
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find a user by its identifier
    async fn find_user(&self, id: &str) -> StoreResult<User>;

    /// Persist a new user; the store assigns the identifier
    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Find the record stored under `key`
    async fn find_record(&self, key: &RecordKey) -> StoreResult<OvertimeRecord>;

    /// Persist a full record and return the stored shape.
    ///
    /// Drafts without an identifier are inserted, or overwrite the record
    /// already stored under the same key. Drafts with an identifier overwrite
    /// that record. Every overwrite refreshes `updated_at`.
    async fn save_record(&self, draft: &RecordDraft) -> StoreResult<OvertimeRecord>;

    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Release the backend's connections
    async fn close(&self) {}
}
