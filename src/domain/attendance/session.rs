//! Completed attendance session.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GuildId, MemberId, Timestamp, ValidationError};

/// One continuous interval of voice presence, bounded by a genuine join and
/// a genuine leave.
///
/// Invariant: `leave_timestamp > join_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSession {
    join_timestamp: Timestamp,
    leave_timestamp: Timestamp,
    user_id: MemberId,
    guild_id: GuildId,
}

impl CompletedSession {
    /// Creates a session, rejecting intervals that do not move forward in time.
    pub fn new(
        join_timestamp: Timestamp,
        leave_timestamp: Timestamp,
        user_id: MemberId,
        guild_id: GuildId,
    ) -> Result<Self, ValidationError> {
        if !leave_timestamp.is_after(&join_timestamp) {
            return Err(ValidationError::not_after("leave_timestamp", "join_timestamp"));
        }
        Ok(Self {
            join_timestamp,
            leave_timestamp,
            user_id,
            guild_id,
        })
    }

    pub fn join_timestamp(&self) -> Timestamp {
        self.join_timestamp
    }

    pub fn leave_timestamp(&self) -> Timestamp {
        self.leave_timestamp
    }

    pub fn user_id(&self) -> &MemberId {
        &self.user_id
    }

    pub fn guild_id(&self) -> &GuildId {
        &self.guild_id
    }

    /// Length of the session; always positive.
    pub fn duration(&self) -> Duration {
        self.leave_timestamp.duration_since(&self.join_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (MemberId, GuildId) {
        (MemberId::new("m1").unwrap(), GuildId::new("g1").unwrap())
    }

    #[test]
    fn new_accepts_forward_interval() {
        let (member, guild) = ids();
        let join = Timestamp::from_unix_secs(0).unwrap();
        let session = CompletedSession::new(join, join.plus_secs(200), member, guild).unwrap();

        assert_eq!(session.duration(), Duration::seconds(200));
        assert_eq!(session.user_id().as_str(), "m1");
        assert_eq!(session.guild_id().as_str(), "g1");
    }

    #[test]
    fn new_rejects_zero_length_interval() {
        let (member, guild) = ids();
        let join = Timestamp::from_unix_secs(0).unwrap();
        let result = CompletedSession::new(join, join, member, guild);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::not_after("leave_timestamp", "join_timestamp")
        );
    }

    #[test]
    fn new_rejects_backwards_interval() {
        let (member, guild) = ids();
        let join = Timestamp::from_unix_secs(100).unwrap();
        assert!(CompletedSession::new(join, join.plus_secs(-1), member, guild).is_err());
    }
}
