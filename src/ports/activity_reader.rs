//! ActivityReader port (read side).
//!
//! Aggregate queries over stored sessions and messages, consumed by
//! reporting surfaces. Read-only; never touched by the attendance pipeline.

use async_trait::async_trait;

use crate::domain::activity::{MessageActivitySummary, MessageSample, VoiceActivitySummary};
use crate::domain::foundation::{DomainError, GuildId, MemberId};

#[async_trait]
pub trait ActivityReader: Send + Sync {
    /// Per-user message totals for a guild, highest count first.
    async fn top_users_by_message_count(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<MessageActivitySummary>, DomainError>;

    /// Per-user voice totals for a guild, longest total duration first.
    async fn top_users_by_voice_time(
        &self,
        guild_id: &GuildId,
    ) -> Result<Vec<VoiceActivitySummary>, DomainError>;

    /// Random sample of distinct messages written by a user in a guild.
    async fn sample_user_messages(
        &self,
        user_id: &MemberId,
        guild_id: &GuildId,
        limit: u32,
    ) -> Result<Vec<MessageSample>, DomainError>;
}
