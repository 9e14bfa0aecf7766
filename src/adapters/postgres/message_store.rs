//! PostgreSQL implementation of MessageStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::activity::MessageRecord;
use crate::domain::foundation::{DomainError, MessageId};
use crate::ports::MessageStore;

/// PostgreSQL implementation of MessageStore, backed by the `msgs` table.
#[derive(Clone)]
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn insert_message(&self, record: &MessageRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO msgs (ts, user_id, guild_id, channel_id, msg_id, msg_len)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.timestamp.as_datetime())
        .bind(record.user_id.as_str())
        .bind(record.guild_id.as_str())
        .bind(record.channel_id.as_str())
        .bind(record.message_id.as_str())
        .bind(content_length_column(record.content_length))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database("Failed to insert message", e)
                .with_detail("message_id", record.message_id.as_str())
        })?;

        Ok(())
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM msgs WHERE msg_id = $1")
            .bind(message_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database("Failed to delete message", e)
                    .with_detail("message_id", message_id.as_str())
            })?;

        Ok(result.rows_affected())
    }
}

/// `msg_len` is a 32-bit signed column.
fn content_length_column(len: u32) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
