//! Per-key lane - one task owning one member's session state.
//!
//! A lane applies transitions strictly in arrival order, runs completed
//! sessions through the noise filter and forwards survivors to the sink.
//!
//! A lane that stays idle while `Closed` retires: it closes its queue, applies
//! anything already buffered and returns its final state. The router chains
//! the next lane for the key onto that state, so no transition is lost or
//! reordered across a retirement. Open lanes never retire.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::stats::PipelineStats;
use crate::domain::attendance::{CompletedSession, MemberKey, MemberSessionState, NoiseFilter};
use crate::domain::presence::NormalizedTransition;

/// Settings shared by every lane.
#[derive(Debug, Clone, Copy)]
pub struct LaneSettings {
    pub noise_filter: NoiseFilter,
    pub idle_timeout: Duration,
    pub buffer: usize,
}

/// Where a freshly spawned lane takes its starting state from.
#[derive(Debug)]
pub enum LaneSeed {
    /// No history for the key.
    Fresh,
    /// A retired lane's state, already collected.
    State(MemberSessionState),
    /// A retiring lane that may still be applying buffered transitions.
    Pending(JoinHandle<MemberSessionState>),
}

/// Everything a lane task needs.
pub struct Lane {
    key: MemberKey,
    transitions: mpsc::Receiver<NormalizedTransition>,
    sessions: mpsc::Sender<CompletedSession>,
    settings: LaneSettings,
    stats: Arc<PipelineStats>,
}

impl Lane {
    pub fn new(
        key: MemberKey,
        transitions: mpsc::Receiver<NormalizedTransition>,
        sessions: mpsc::Sender<CompletedSession>,
        settings: LaneSettings,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            key,
            transitions,
            sessions,
            settings,
            stats,
        }
    }

    /// Runs until the queue is closed by the router or the lane retires.
    pub async fn run(mut self, seed: LaneSeed) -> MemberSessionState {
        let mut state = self.resolve(seed).await;
        trace!(key = %self.key, open = state.is_open(), "lane started");

        loop {
            match tokio::time::timeout(self.settings.idle_timeout, self.transitions.recv()).await {
                Ok(Some(transition)) => self.apply(&mut state, &transition).await,
                Ok(None) => {
                    if let Some(since) = state.open_since() {
                        debug!(
                            key = %self.key,
                            since = %since.as_datetime(),
                            "dropping open session at shutdown"
                        );
                    }
                    return state;
                }
                Err(_) if state.is_open() => continue,
                Err(_) => return self.retire(state).await,
            }
        }
    }

    async fn resolve(&self, seed: LaneSeed) -> MemberSessionState {
        match seed {
            LaneSeed::Fresh => MemberSessionState::new(self.key.clone()),
            LaneSeed::State(state) => state,
            LaneSeed::Pending(previous) => match previous.await {
                Ok(state) => state,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "previous lane failed; starting closed");
                    MemberSessionState::new(self.key.clone())
                }
            },
        }
    }

    async fn retire(mut self, mut state: MemberSessionState) -> MemberSessionState {
        self.transitions.close();
        while let Some(transition) = self.transitions.recv().await {
            self.apply(&mut state, &transition).await;
        }
        trace!(key = %self.key, open = state.is_open(), "lane retired");
        state
    }

    async fn apply(&self, state: &mut MemberSessionState, transition: &NormalizedTransition) {
        let Some(candidate) = state.apply(transition) else {
            return;
        };
        self.stats.record_candidate();

        let Some(session) = self.settings.noise_filter.accept(candidate) else {
            self.stats.record_noise();
            debug!(key = %self.key, "session discarded as noise");
            return;
        };

        if self.sessions.send(session).await.is_err() {
            warn!(key = %self.key, "session sink closed; session dropped");
        }
    }
}
