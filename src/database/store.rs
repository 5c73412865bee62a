//! Deadline repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::GroupDeadline;
use crate::utils::errors::Result;

/// Durable `group_id -> deadline_date` storage.
///
/// A missing row is `Ok(None)`, not an error; only an unreachable or
/// failing backend produces `Err`. Implemented over Postgres in
/// production and faked in-memory in tests.
#[async_trait]
pub trait DeadlineRepository: Send + Sync {
    /// Fetch the deadline stored for a group, if any.
    async fn get(&self, group_id: i64) -> Result<Option<NaiveDate>>;

    /// Insert or overwrite the deadline for a group. Idempotent.
    async fn upsert(&self, group_id: i64, deadline_date: NaiveDate) -> Result<()>;

    /// All stored deadlines, used to rehydrate the scheduler at startup.
    async fn list(&self) -> Result<Vec<GroupDeadline>>;
}

/// Postgres-backed deadline store
#[derive(Clone)]
pub struct DeadlineStore {
    pool: PgPool,
}

impl DeadlineStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the backing table exists. Idempotent; called once at startup.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS deadlines (
                group_id BIGINT PRIMARY KEY,
                deadline_date DATE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database schema initialized");
        Ok(())
    }
}

#[async_trait]
impl DeadlineRepository for DeadlineStore {
    async fn get(&self, group_id: i64) -> Result<Option<NaiveDate>> {
        let deadline_date: Option<NaiveDate> =
            sqlx::query_scalar("SELECT deadline_date FROM deadlines WHERE group_id = $1")
                .bind(group_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(deadline_date)
    }

    async fn upsert(&self, group_id: i64, deadline_date: NaiveDate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO deadlines (group_id, deadline_date)
            VALUES ($1, $2)
            ON CONFLICT (group_id) DO UPDATE SET deadline_date = $2
            "#,
        )
        .bind(group_id)
        .bind(deadline_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<GroupDeadline>> {
        let deadlines = sqlx::query_as::<_, GroupDeadline>(
            "SELECT group_id, deadline_date FROM deadlines ORDER BY group_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deadlines)
    }
}
