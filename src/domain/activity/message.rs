//! Text-message activity records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, GuildId, MemberId, MessageId, Timestamp};

/// A text message as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub timestamp: Timestamp,
    pub author_id: MemberId,
    #[serde(default)]
    pub is_bot: bool,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub content: String,
}

impl RawMessage {
    /// Bot authors and empty messages are never recorded.
    pub fn is_trackable(&self) -> bool {
        !self.is_bot && !self.content.is_empty()
    }

    pub fn is_command(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.content.starts_with(prefix)
    }
}

/// One stored message row. Only the length of the content is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub timestamp: Timestamp,
    pub user_id: MemberId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub content_length: u32,
}

impl From<RawMessage> for MessageRecord {
    fn from(raw: RawMessage) -> Self {
        let content_length = u32::try_from(raw.content.chars().count()).unwrap_or(u32::MAX);
        Self {
            timestamp: raw.timestamp,
            user_id: raw.author_id,
            guild_id: raw.guild_id,
            channel_id: raw.channel_id,
            message_id: raw.message_id,
            content_length,
        }
    }
}
