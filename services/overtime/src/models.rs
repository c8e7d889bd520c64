//! API models for entities and request/response payloads

pub mod record;
pub mod user;

pub use record::{
    OvertimeEntry, OvertimeRecord, RecordDraft, RecordKey, RecordQuery, SaveRecordRequest,
    SaveRecordResponse,
};
pub use user::{CreateUserRequest, NewUser, User};
