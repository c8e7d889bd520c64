//! PostgreSQL-backed record store

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{NewUser, OvertimeEntry, OvertimeRecord, RecordDraft, RecordKey, User};

/// Schema migrations embedded in the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Record store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a new store over an initialized pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn record_from_row(row: &PgRow) -> Result<OvertimeRecord, sqlx::Error> {
    let Json(entries): Json<Vec<OvertimeEntry>> = row.try_get("entries")?;

    Ok(OvertimeRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        year: row.try_get("year")?,
        month: row.try_get("month")?,
        entries,
        salary: row.try_get("salary")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_user(&self, id: &str) -> StoreResult<User> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(user_from_row(&row)?)
    }

    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User> {
        info!("Creating new user: {}", new_user.username);

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    async fn find_record(&self, key: &RecordKey) -> StoreResult<OvertimeRecord> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, year, month, entries, salary, created_at, updated_at
            FROM overtime_records
            WHERE user_id = $1 AND year = $2 AND month = $3
            "#,
        )
        .bind(&key.user_id)
        .bind(key.year)
        .bind(key.month)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(record_from_row(&row)?)
    }

    async fn save_record(&self, draft: &RecordDraft) -> StoreResult<OvertimeRecord> {
        let row = match draft.id {
            Some(id) => sqlx::query(
                r#"
                UPDATE overtime_records
                SET entries = $2, salary = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING id, user_id, year, month, entries, salary, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(Json(&draft.entries))
            .bind(draft.salary)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?,
            // Two first saves for one key may race here; the conflict clause
            // turns the later one into an overwrite.
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO overtime_records (user_id, year, month, entries, salary)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (user_id, year, month) DO UPDATE
                    SET entries = EXCLUDED.entries,
                        salary = EXCLUDED.salary,
                        updated_at = NOW()
                    RETURNING id, user_id, year, month, entries, salary, created_at, updated_at
                    "#,
                )
                .bind(&draft.key.user_id)
                .bind(draft.key.year)
                .bind(draft.key.month)
                .bind(Json(&draft.entries))
                .bind(draft.salary)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(record_from_row(&row)?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        common::database::close_pool(&self.pool).await;
    }
}
