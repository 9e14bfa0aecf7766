//! Noise filter for candidate sessions.
//!
//! Sessions at or below the minimum duration are channel flicker, not
//! attendance. The filter is stateless.

use chrono::Duration;

use super::CompletedSession;

/// Default minimum session length in seconds.
pub const DEFAULT_MIN_SESSION_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseFilter {
    min_duration: Duration,
}

impl NoiseFilter {
    pub fn new(min_duration: Duration) -> Self {
        Self { min_duration }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::seconds(secs.min(i64::MAX as u64 / 1_000) as i64))
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// True iff the session is strictly longer than the threshold.
    pub fn passes(&self, session: &CompletedSession) -> bool {
        session.duration() > self.min_duration
    }

    /// Forwards the candidate only if it passes.
    pub fn accept(&self, candidate: CompletedSession) -> Option<CompletedSession> {
        self.passes(&candidate).then_some(candidate)
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::from_secs(DEFAULT_MIN_SESSION_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GuildId, MemberId, Timestamp};
    use proptest::prelude::*;

    fn session_of(secs: i64) -> CompletedSession {
        let join = Timestamp::from_unix_secs(1_700_000_000).unwrap();
        CompletedSession::new(
            join,
            join.plus_secs(secs),
            MemberId::new("m1").unwrap(),
            GuildId::new("g1").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn default_threshold_is_two_minutes() {
        assert_eq!(NoiseFilter::default().min_duration(), Duration::minutes(2));
    }

    #[test]
    fn short_session_is_dropped() {
        assert!(NoiseFilter::default().accept(session_of(30)).is_none());
    }

    #[test]
    fn session_at_threshold_is_dropped() {
        assert!(NoiseFilter::default().accept(session_of(120)).is_none());
    }

    #[test]
    fn session_just_above_threshold_passes() {
        let session = session_of(121);
        assert_eq!(NoiseFilter::default().accept(session.clone()), Some(session));
    }

    #[test]
    fn zero_threshold_passes_every_valid_session() {
        assert!(NoiseFilter::from_secs(0).passes(&session_of(1)));
    }

    proptest! {
        #[test]
        fn passes_iff_strictly_longer_than_threshold(threshold in 0u64..10_000, secs in 1i64..20_000) {
            let filter = NoiseFilter::from_secs(threshold);
            prop_assert_eq!(filter.passes(&session_of(secs)), secs > threshold as i64);
        }
    }
}
