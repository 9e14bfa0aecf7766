//! Aggregate activity rows returned by the query side of storage.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, MemberId, MessageId};

/// Message totals for one user in a guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageActivitySummary {
    pub user_id: MemberId,
    pub message_count: i64,
    pub average_length: f64,
}

/// Voice totals for one user in a guild. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceActivitySummary {
    pub user_id: MemberId,
    pub session_count: i64,
    pub average_duration_secs: f64,
    pub total_duration_secs: f64,
}

impl VoiceActivitySummary {
    pub fn average_duration_hhmm(&self) -> String {
        format_hours_minutes(self.average_duration_secs)
    }

    pub fn total_duration_hhmm(&self) -> String {
        format_hours_minutes(self.total_duration_secs)
    }
}

/// A stored message reference, used to sample a user's messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSample {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Renders seconds as `HH:MM`. Hours are zero-padded to two digits and grow
/// past two digits as needed; seconds are truncated.
pub fn format_hours_minutes(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let hours = (secs / 3600.0).floor();
    let minutes = (secs / 60.0 - hours * 60.0).floor();
    format!("{:02}:{:02}", hours as u64, minutes as u64)
}
