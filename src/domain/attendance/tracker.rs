//! Per-member session state machine.
//!
//! One [`MemberSessionState`] exists per [`MemberKey`] and is owned by that
//! key's lane. It pairs genuine joins with genuine leaves:
//!
//! | Phase    | Join           | Leave                    | Move   |
//! |----------|----------------|--------------------------|--------|
//! | `Closed` | open at `t`    | ignored                  | ignored|
//! | `Open`   | stay open      | emit `[since, t]`, close | stay   |
//!
//! A leave seen while `Closed` is never trusted: the member may have been in
//! a channel before observation started, and the true join time is unknown.
//! Such leaves are dropped until a clean join has been observed, and after
//! that an orphan leave is still dropped rather than guessed at.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::presence::{NormalizedTransition, TransitionKind};

use super::{CompletedSession, MemberKey};

/// Whether a session is currently open for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    Closed,
    Open { since: Timestamp },
}

impl SessionPhase {
    pub fn is_open(&self) -> bool {
        matches!(self, SessionPhase::Open { .. })
    }

    pub fn open_since(&self) -> Option<Timestamp> {
        match self {
            SessionPhase::Open { since } => Some(*since),
            SessionPhase::Closed => None,
        }
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (SessionPhase::Closed, SessionPhase::Open { .. })
                | (SessionPhase::Open { .. }, SessionPhase::Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            // The concrete open time is supplied by the join.
            SessionPhase::Closed => vec![SessionPhase::Open {
                since: Timestamp::now(),
            }],
            SessionPhase::Open { .. } => vec![SessionPhase::Closed],
        }
    }
}

/// Session state for a single `(guild, member)` key.
#[derive(Debug, Clone)]
pub struct MemberSessionState {
    key: MemberKey,
    phase: SessionPhase,
    has_observed_valid_start: bool,
}

impl MemberSessionState {
    /// Creates the state for a key in the `Closed` phase.
    pub fn new(key: MemberKey) -> Self {
        Self {
            key,
            phase: SessionPhase::Closed,
            has_observed_valid_start: false,
        }
    }

    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    /// Set iff a join has been observed without an intervening leave.
    pub fn open_since(&self) -> Option<Timestamp> {
        self.phase.open_since()
    }

    /// True once this key has seen at least one clean join.
    pub fn has_observed_valid_start(&self) -> bool {
        self.has_observed_valid_start
    }

    /// Applies one transition and returns the candidate session it completes,
    /// if any.
    pub fn apply(&mut self, transition: &NormalizedTransition) -> Option<CompletedSession> {
        debug_assert_eq!(transition.key(), self.key, "transition routed to wrong lane");

        match (self.phase, transition.kind) {
            (SessionPhase::Closed, TransitionKind::Join) => {
                self.enter(SessionPhase::Open {
                    since: transition.timestamp,
                });
                self.has_observed_valid_start = true;
                trace!(key = %self.key, at = %transition.timestamp.as_datetime(), "session opened");
                None
            }
            (SessionPhase::Closed, TransitionKind::Leave) => {
                if self.has_observed_valid_start {
                    trace!(key = %self.key, "orphan leave ignored");
                } else {
                    trace!(key = %self.key, "leave before first clean join ignored");
                }
                None
            }
            (SessionPhase::Closed, TransitionKind::Move) => {
                trace!(key = %self.key, "move while closed ignored");
                None
            }
            (SessionPhase::Open { since }, TransitionKind::Leave) => {
                self.enter(SessionPhase::Closed);
                match CompletedSession::new(
                    since,
                    transition.timestamp,
                    self.key.member_id.clone(),
                    self.key.guild_id.clone(),
                ) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        debug!(key = %self.key, error = %e, "discarding non-positive session");
                        None
                    }
                }
            }
            (SessionPhase::Open { .. }, TransitionKind::Join | TransitionKind::Move) => None,
        }
    }

    fn enter(&mut self, next: SessionPhase) {
        match self.phase.transition_to(next) {
            Ok(phase) => self.phase = phase,
            Err(e) => warn!(key = %self.key, error = %e, "rejected session phase change"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GuildId, MemberId};

    fn key() -> MemberKey {
        MemberKey::new(GuildId::new("g1").unwrap(), MemberId::new("m1").unwrap())
    }

    fn at(secs: i64, kind: TransitionKind) -> NormalizedTransition {
        let key = key();
        NormalizedTransition::new(
            Timestamp::from_unix_secs(secs).unwrap(),
            key.member_id,
            key.guild_id,
            kind,
        )
    }

    #[test]
    fn starts_closed_without_valid_start() {
        let state = MemberSessionState::new(key());
        assert_eq!(state.phase(), SessionPhase::Closed);
        assert!(state.open_since().is_none());
        assert!(!state.has_observed_valid_start());
    }

    #[test]
    fn join_opens_session_without_emitting() {
        let mut state = MemberSessionState::new(key());
        assert!(state.apply(&at(10, TransitionKind::Join)).is_none());
        assert!(state.is_open());
        assert_eq!(state.open_since().unwrap().as_unix_secs(), 10);
        assert!(state.has_observed_valid_start());
    }

    #[test]
    fn join_then_leave_emits_matching_session() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(0, TransitionKind::Join));
        let session = state.apply(&at(200, TransitionKind::Leave)).unwrap();

        assert_eq!(session.join_timestamp().as_unix_secs(), 0);
        assert_eq!(session.leave_timestamp().as_unix_secs(), 200);
        assert_eq!(session.user_id().as_str(), "m1");
        assert_eq!(session.guild_id().as_str(), "g1");
        assert_eq!(state.phase(), SessionPhase::Closed);
    }

    #[test]
    fn leading_leave_is_ignored_and_stays_closed() {
        let mut state = MemberSessionState::new(key());
        assert!(state.apply(&at(0, TransitionKind::Leave)).is_none());
        assert_eq!(state.phase(), SessionPhase::Closed);
        assert!(!state.has_observed_valid_start());
    }

    #[test]
    fn leave_after_leading_leave_and_join_pairs_with_join() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(0, TransitionKind::Leave));
        state.apply(&at(50, TransitionKind::Join));
        let session = state.apply(&at(400, TransitionKind::Leave)).unwrap();
        assert_eq!(session.join_timestamp().as_unix_secs(), 50);
    }

    #[test]
    fn orphan_leave_after_completed_session_is_ignored() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(0, TransitionKind::Join));
        state.apply(&at(300, TransitionKind::Leave));
        assert!(state.apply(&at(400, TransitionKind::Leave)).is_none());
        assert_eq!(state.phase(), SessionPhase::Closed);
        assert!(state.has_observed_valid_start());
    }

    #[test]
    fn move_while_open_keeps_original_start() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(0, TransitionKind::Join));
        assert!(state.apply(&at(100, TransitionKind::Move)).is_none());
        assert_eq!(state.open_since().unwrap().as_unix_secs(), 0);

        let session = state.apply(&at(250, TransitionKind::Leave)).unwrap();
        assert_eq!(session.join_timestamp().as_unix_secs(), 0);
        assert_eq!(session.leave_timestamp().as_unix_secs(), 250);
    }

    #[test]
    fn move_while_closed_does_not_open() {
        let mut state = MemberSessionState::new(key());
        assert!(state.apply(&at(0, TransitionKind::Move)).is_none());
        assert!(!state.is_open());
        assert!(state.apply(&at(300, TransitionKind::Leave)).is_none());
    }

    #[test]
    fn repeated_join_while_open_keeps_first_start() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(0, TransitionKind::Join));
        state.apply(&at(60, TransitionKind::Join));
        let session = state.apply(&at(300, TransitionKind::Leave)).unwrap();
        assert_eq!(session.join_timestamp().as_unix_secs(), 0);
    }

    #[test]
    fn non_positive_interval_closes_without_emitting() {
        let mut state = MemberSessionState::new(key());
        state.apply(&at(100, TransitionKind::Join));
        assert!(state.apply(&at(100, TransitionKind::Leave)).is_none());
        assert_eq!(state.phase(), SessionPhase::Closed);
    }

    #[test]
    fn cycles_between_closed_and_open() {
        let mut state = MemberSessionState::new(key());
        let mut emitted = Vec::new();
        for (start, end) in [(0, 200), (300, 600), (1000, 1500)] {
            state.apply(&at(start, TransitionKind::Join));
            emitted.extend(state.apply(&at(end, TransitionKind::Leave)));
        }
        assert_eq!(emitted.len(), 3);
        assert_eq!(emitted[1].join_timestamp().as_unix_secs(), 300);
    }

    #[test]
    fn phase_transitions_are_validated() {
        let open = SessionPhase::Open {
            since: Timestamp::from_unix_secs(0).unwrap(),
        };
        assert!(SessionPhase::Closed.can_transition_to(&open));
        assert!(open.can_transition_to(&SessionPhase::Closed));
        assert!(!SessionPhase::Closed.can_transition_to(&SessionPhase::Closed));
        assert!(!open.can_transition_to(&open));
        assert!(!SessionPhase::Closed.is_terminal());
        assert!(!open.is_terminal());
    }
}
