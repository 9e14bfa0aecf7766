//! Partition key for per-member processing lanes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{GuildId, MemberId};

/// `(guild, member)` pair. Each key owns exactly one session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    pub guild_id: GuildId,
    pub member_id: MemberId,
}

impl MemberKey {
    pub fn new(guild_id: GuildId, member_id: MemberId) -> Self {
        Self {
            guild_id,
            member_id,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.guild_id, self.member_id)
    }
}
