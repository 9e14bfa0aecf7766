//! Raw presence-transition notifications as delivered by the gateway.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, GuildId, MemberId, Timestamp};

/// A single voice-state change for one member.
///
/// Ephemeral: consumed once by the normalizer and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransitionEvent {
    pub timestamp: Timestamp,
    pub member_id: MemberId,
    pub guild_id: GuildId,
    /// Automated participants are not tracked.
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub previous_channel_id: Option<ChannelId>,
    #[serde(default)]
    pub next_channel_id: Option<ChannelId>,
}

impl RawTransitionEvent {
    /// Creates a raw event for a human member.
    pub fn new(
        timestamp: Timestamp,
        member_id: MemberId,
        guild_id: GuildId,
        previous_channel_id: Option<ChannelId>,
        next_channel_id: Option<ChannelId>,
    ) -> Self {
        Self {
            timestamp,
            member_id,
            guild_id,
            is_bot: false,
            previous_channel_id,
            next_channel_id,
        }
    }

    /// Marks the event as authored by an automated participant.
    pub fn authored_by_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }
}
