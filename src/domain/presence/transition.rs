//! Canonical presence transitions.

use serde::{Deserialize, Serialize};

use crate::domain::attendance::MemberKey;
use crate::domain::foundation::{GuildId, MemberId, Timestamp};

/// What a transition means for the member's voice presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Not present before, present after.
    Join,
    /// Present before, not present after.
    Leave,
    /// Present on both sides (channel hop or in-channel state change).
    Move,
}

impl TransitionKind {
    /// Classifies a presence change.
    ///
    /// Returns `None` when the member was absent on both sides, which carries
    /// no presence information.
    pub fn from_presence(was_present: bool, is_present: bool) -> Option<Self> {
        match (was_present, is_present) {
            (false, true) => Some(TransitionKind::Join),
            (true, false) => Some(TransitionKind::Leave),
            (true, true) => Some(TransitionKind::Move),
            (false, false) => None,
        }
    }

    pub fn was_present(&self) -> bool {
        matches!(self, TransitionKind::Leave | TransitionKind::Move)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, TransitionKind::Join | TransitionKind::Move)
    }
}

/// A presence transition reduced to the fields the tracker needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransition {
    pub timestamp: Timestamp,
    pub member_id: MemberId,
    pub guild_id: GuildId,
    pub kind: TransitionKind,
}

impl NormalizedTransition {
    pub fn new(
        timestamp: Timestamp,
        member_id: MemberId,
        guild_id: GuildId,
        kind: TransitionKind,
    ) -> Self {
        Self {
            timestamp,
            member_id,
            guild_id,
            kind,
        }
    }

    /// True iff the member was in a voice channel before this transition.
    pub fn was_present(&self) -> bool {
        self.kind.was_present()
    }

    /// True iff the member is in a voice channel after this transition.
    pub fn is_present(&self) -> bool {
        self.kind.is_present()
    }

    /// True for channel-to-channel moves, which never bound a session.
    pub fn is_move(&self) -> bool {
        self.kind == TransitionKind::Move
    }

    /// Partition key of the lane that must process this transition.
    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.guild_id.clone(), self.member_id.clone())
    }
}
