//! PostgreSQL implementation of SessionStore.
//!
//! Persists accepted attendance sessions to the `vc` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::attendance::CompletedSession;
use crate::domain::foundation::DomainError;
use crate::ports::SessionStore;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert_session(&self, session: &CompletedSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO vc (ts_in, ts_out, user_id, guild_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.join_timestamp().as_datetime())
        .bind(session.leave_timestamp().as_datetime())
        .bind(session.user_id().as_str())
        .bind(session.guild_id().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert session", e))?;

        Ok(())
    }
}
