//! Integration tests for the attendance pipeline.
//!
//! Drives raw presence events through normalizer, router, lanes, noise
//! filter and sink into an in-memory store.

use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use vc_attendance::adapters::InMemoryActivityStore;
use vc_attendance::application::AttendancePipeline;
use vc_attendance::config::TrackingConfig;
use vc_attendance::domain::attendance::{CompletedSession, MemberKey, MemberSessionState, NoiseFilter};
use vc_attendance::domain::foundation::{ChannelId, DomainError, GuildId, MemberId, Timestamp};
use vc_attendance::domain::presence::{RawTransitionEvent, TransitionNormalizer};
use vc_attendance::ports::SessionStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Join,
    Leave,
    Move,
}

fn event(member: &str, guild: &str, secs: i64, presence: Presence) -> RawTransitionEvent {
    let channel = |id: &str| Some(ChannelId::new(id).unwrap());
    let (previous, next) = match presence {
        Presence::Join => (None, channel("c1")),
        Presence::Leave => (channel("c1"), None),
        Presence::Move => (channel("c1"), channel("c2")),
    };
    RawTransitionEvent::new(
        Timestamp::from_unix_secs(secs).unwrap(),
        MemberId::new(member).unwrap(),
        GuildId::new(guild).unwrap(),
        previous,
        next,
    )
}

async fn run(events: Vec<RawTransitionEvent>) -> Vec<CompletedSession> {
    let store = Arc::new(InMemoryActivityStore::new());
    let mut pipeline = AttendancePipeline::new(store.clone(), &TrackingConfig::default());
    for raw in events {
        pipeline.ingest(raw).await;
    }
    pipeline.shutdown().await;
    store.sessions().await
}

fn bounds(session: &CompletedSession) -> (i64, i64) {
    (
        session.join_timestamp().as_unix_secs(),
        session.leave_timestamp().as_unix_secs(),
    )
}

/// Store that takes a while to answer.
struct SlowStore {
    delay: Duration,
    sessions: RwLock<Vec<CompletedSession>>,
}

#[async_trait]
impl SessionStore for SlowStore {
    async fn insert_session(&self, session: &CompletedSession) -> Result<(), DomainError> {
        tokio::time::sleep(self.delay).await;
        self.sessions.write().await.push(session.clone());
        Ok(())
    }
}

// =============================================================================
// Session reconstruction
// =============================================================================

#[tokio::test]
async fn short_visit_is_discarded() {
    let sessions = run(vec![
        event("m", "g", 0, Presence::Join),
        event("m", "g", 30, Presence::Leave),
    ])
    .await;
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn long_visit_is_stored() {
    let sessions = run(vec![
        event("m", "g", 0, Presence::Join),
        event("m", "g", 200, Presence::Leave),
    ])
    .await;

    assert_eq!(sessions.len(), 1);
    assert_eq!(bounds(&sessions[0]), (0, 200));
    assert_eq!(sessions[0].user_id().as_str(), "m");
    assert_eq!(sessions[0].guild_id().as_str(), "g");
}

#[tokio::test]
async fn move_does_not_split_session() {
    let sessions = run(vec![
        event("m", "g", 0, Presence::Join),
        event("m", "g", 100, Presence::Move),
        event("m", "g", 250, Presence::Leave),
    ])
    .await;

    assert_eq!(sessions.len(), 1);
    assert_eq!(bounds(&sessions[0]), (0, 250));
}

#[tokio::test]
async fn leading_leave_produces_nothing() {
    let sessions = run(vec![event("m", "g", 0, Presence::Leave)]).await;
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn leave_before_first_join_does_not_pair_with_later_join() {
    let sessions = run(vec![
        event("m", "g", 0, Presence::Leave),
        event("m", "g", 500, Presence::Join),
        event("m", "g", 800, Presence::Leave),
    ])
    .await;

    assert_eq!(sessions.len(), 1);
    assert_eq!(bounds(&sessions[0]), (500, 800));
}

#[tokio::test]
async fn exactly_threshold_is_noise() {
    let sessions = run(vec![
        event("m", "g", 0, Presence::Join),
        event("m", "g", 120, Presence::Leave),
        event("m", "g", 200, Presence::Join),
        event("m", "g", 321, Presence::Leave),
    ])
    .await;

    assert_eq!(sessions.len(), 1);
    assert_eq!(bounds(&sessions[0]), (200, 321));
}

#[tokio::test]
async fn same_member_in_two_guilds_is_tracked_separately() {
    let mut sessions = run(vec![
        event("m", "g1", 0, Presence::Join),
        event("m", "g2", 100, Presence::Join),
        event("m", "g1", 400, Presence::Leave),
        event("m", "g2", 500, Presence::Leave),
    ])
    .await;
    sessions.sort_by_key(|s| s.guild_id().as_str().to_string());

    assert_eq!(sessions.len(), 2);
    assert_eq!(bounds(&sessions[0]), (0, 400));
    assert_eq!(bounds(&sessions[1]), (100, 500));
}

#[tokio::test]
async fn open_sessions_are_dropped_at_shutdown() {
    let store = Arc::new(InMemoryActivityStore::new());
    let mut pipeline = AttendancePipeline::new(store.clone(), &TrackingConfig::default());
    pipeline.ingest(event("m", "g", 0, Presence::Join)).await;

    let stats = pipeline.shutdown().await;
    assert_eq!(stats.candidate_sessions, 0);
    assert_eq!(store.session_count().await, 0);
}

// =============================================================================
// Sink behaviour
// =============================================================================

#[tokio::test]
async fn storage_failure_does_not_stop_processing() {
    let store = Arc::new(InMemoryActivityStore::failing());
    let mut pipeline = AttendancePipeline::new(store.clone(), &TrackingConfig::default());

    pipeline.ingest(event("a", "g", 0, Presence::Join)).await;
    pipeline.ingest(event("a", "g", 300, Presence::Leave)).await;
    pipeline.ingest(event("b", "g", 0, Presence::Join)).await;
    pipeline.ingest(event("b", "g", 300, Presence::Leave)).await;

    let stats = pipeline.shutdown().await;
    assert_eq!(stats.events_received, 4);
    assert_eq!(stats.persist_failures, 2);
    assert_eq!(stats.sessions_persisted, 0);
}

#[tokio::test(start_paused = true)]
async fn slow_storage_does_not_serialize_writes() {
    let store = Arc::new(SlowStore {
        delay: Duration::from_secs(5),
        sessions: RwLock::new(Vec::new()),
    });
    let mut pipeline = AttendancePipeline::new(store.clone(), &TrackingConfig::default());

    let started = tokio::time::Instant::now();
    for member in ["a", "b", "c", "d"] {
        pipeline.ingest(event(member, "g", 0, Presence::Join)).await;
        pipeline.ingest(event(member, "g", 600, Presence::Leave)).await;
    }
    let stats = pipeline.shutdown().await;

    assert_eq!(stats.sessions_persisted, 4);
    assert_eq!(store.sessions.read().await.len(), 4);
    assert!(started.elapsed() < Duration::from_secs(10));
}

// =============================================================================
// Per-key isolation
// =============================================================================

const MEMBERS: [&str; 3] = ["a", "b", "c"];

fn presence_strategy() -> impl Strategy<Value = Presence> {
    prop_oneof![Just(Presence::Join), Just(Presence::Leave), Just(Presence::Move)]
}

/// Per-member ordered steps of (seconds since previous step, presence).
fn history_strategy() -> impl Strategy<Value = Vec<(i64, Presence)>> {
    prop::collection::vec((1i64..400, presence_strategy()), 0..12)
}

fn timeline(member: &str, steps: &[(i64, Presence)]) -> Vec<RawTransitionEvent> {
    let mut at = 0;
    steps
        .iter()
        .map(|&(gap, presence)| {
            at += gap;
            event(member, "g", at, presence)
        })
        .collect()
}

/// What a single member's history yields when processed on its own.
fn expected_sessions(events: &[RawTransitionEvent]) -> Vec<(i64, i64)> {
    let normalizer = TransitionNormalizer::new();
    let filter = NoiseFilter::default();
    let mut state: Option<MemberSessionState> = None;
    let mut sessions = Vec::new();

    for raw in events {
        let Some(transition) = normalizer.normalize(raw.clone()) else {
            continue;
        };
        let tracker = state.get_or_insert_with(|| {
            MemberSessionState::new(MemberKey::new(
                transition.guild_id.clone(),
                transition.member_id.clone(),
            ))
        });
        if let Some(session) = tracker.apply(&transition).and_then(|s| filter.accept(s)) {
            sessions.push(bounds(&session));
        }
    }
    sessions
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interleaving_does_not_change_any_members_sessions(
        histories in prop::collection::vec(history_strategy(), MEMBERS.len()),
        picks in prop::collection::vec(0usize..MEMBERS.len(), 0..64),
    ) {
        let timelines: Vec<Vec<RawTransitionEvent>> = MEMBERS
            .iter()
            .zip(&histories)
            .map(|(member, steps)| timeline(member, steps))
            .collect();

        // Merge the timelines in an arbitrary order that keeps each member's
        // own events in sequence.
        let mut cursors = vec![0usize; timelines.len()];
        let mut merged = Vec::new();
        let mut picks = picks.into_iter();
        while cursors.iter().zip(&timelines).any(|(c, t)| *c < t.len()) {
            let preferred = picks.next().unwrap_or(0);
            let lane = (0..timelines.len())
                .map(|offset| (preferred + offset) % timelines.len())
                .find(|&i| cursors[i] < timelines[i].len())
                .unwrap();
            merged.push(timelines[lane][cursors[lane]].clone());
            cursors[lane] += 1;
        }

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let stored = runtime.block_on(run(merged));

        for (member, events) in MEMBERS.iter().zip(&timelines) {
            let mut actual: Vec<(i64, i64)> = stored
                .iter()
                .filter(|s| s.user_id().as_str() == *member)
                .map(bounds)
                .collect();
            actual.sort();
            prop_assert_eq!(actual, expected_sessions(events));
        }
    }
}
