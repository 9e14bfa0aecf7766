//! PostgreSQL implementation of ActivityReader.
//!
//! Aggregate queries over the `msgs` and `vc` tables. Numeric aggregates are
//! cast to `float8` so they decode as `f64`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::activity::{MessageActivitySummary, MessageSample, VoiceActivitySummary};
use crate::domain::foundation::{
    ChannelId, DomainError, ErrorCode, GuildId, MemberId, MessageId,
};
use crate::ports::ActivityReader;

/// PostgreSQL implementation of ActivityReader.
#[derive(Clone)]
pub struct PostgresActivityReader {
    pool: PgPool,
}

impl PostgresActivityReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityReader for PostgresActivityReader {
    async fn top_users_by_message_count(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<MessageActivitySummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT COUNT(msgs.id) AS msg_count,
                   AVG(msgs.msg_len)::float8 AS avg_length,
                   msgs.user_id
            FROM msgs
            WHERE msgs.guild_id = $1
            GROUP BY msgs.user_id
            ORDER BY msg_count DESC
            "#,
        )
        .bind(guild_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch message activity", e))?;

        rows.into_iter().map(row_to_message_summary).collect()
    }

    async fn top_users_by_voice_time(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<VoiceActivitySummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT COUNT(vc.id) AS vc_count,
                   EXTRACT(EPOCH FROM AVG(vc.ts_out - vc.ts_in))::float8 AS avg_duration,
                   EXTRACT(EPOCH FROM SUM(vc.ts_out - vc.ts_in))::float8 AS total_duration,
                   vc.user_id
            FROM vc
            WHERE vc.guild_id = $1
            GROUP BY vc.user_id
            ORDER BY total_duration DESC
            "#,
        )
        .bind(guild_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch voice activity", e))?;

        rows.into_iter().map(row_to_voice_summary).collect()
    }

    async fn sample_user_messages(
        &self,
        user_id: &MemberId,
        guild_id: &GuildId,
        limit: u32,
    ) -> Result<Vec<MessageSample>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT channel_id, msg_id FROM
                (SELECT DISTINCT msg_id, channel_id, guild_id, user_id FROM msgs) AS distinct_msgs
            WHERE user_id = $1 AND guild_id = $2
            ORDER BY random()
            LIMIT $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(guild_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to sample user messages", e))?;

        rows.into_iter().map(row_to_message_sample).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::database(&format!("Failed to get {}", column), e))
}

fn stored_id<T, E: std::fmt::Display>(
    column: &str,
    parsed: Result<T, E>,
) -> Result<T, DomainError> {
    parsed.map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", column, e))
    })
}

fn row_to_message_summary(row: PgRow) -> Result<MessageActivitySummary, DomainError> {
    let user_id: String = get(&row, "user_id")?;
    let average_length: Option<f64> = get(&row, "avg_length")?;

    Ok(MessageActivitySummary {
        user_id: stored_id("user_id", MemberId::new(user_id))?,
        message_count: get(&row, "msg_count")?,
        average_length: average_length.unwrap_or_default(),
    })
}

fn row_to_voice_summary(row: PgRow) -> Result<VoiceActivitySummary, DomainError> {
    let user_id: String = get(&row, "user_id")?;
    let average: Option<f64> = get(&row, "avg_duration")?;
    let total: Option<f64> = get(&row, "total_duration")?;

    Ok(VoiceActivitySummary {
        user_id: stored_id("user_id", MemberId::new(user_id))?,
        session_count: get(&row, "vc_count")?,
        average_duration_secs: average.unwrap_or_default(),
        total_duration_secs: total.unwrap_or_default(),
    })
}

fn row_to_message_sample(row: PgRow) -> Result<MessageSample, DomainError> {
    let channel_id: String = get(&row, "channel_id")?;
    let message_id: String = get(&row, "msg_id")?;

    Ok(MessageSample {
        channel_id: stored_id("channel_id", ChannelId::new(channel_id))?,
        message_id: stored_id("msg_id", MessageId::new(message_id))?,
    })
}
