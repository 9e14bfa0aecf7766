//! Per-key router.
//!
//! Partitions normalized transitions by `(guild, member)` and delivers each
//! to that key's lane, spawning lanes on first sight. Moves never change
//! session state and are dropped here.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::SendError};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::lane::{Lane, LaneSeed, LaneSettings};
use super::stats::PipelineStats;
use crate::domain::attendance::{CompletedSession, MemberKey, MemberSessionState};
use crate::domain::presence::NormalizedTransition;

/// Retired lanes are swept from the map after this many routed transitions.
const PRUNE_INTERVAL: usize = 1024;

struct LaneHandle {
    sender: mpsc::Sender<NormalizedTransition>,
    task: JoinHandle<MemberSessionState>,
}

impl LaneHandle {
    fn is_retired(&self) -> bool {
        self.sender.is_closed() && self.task.is_finished()
    }
}

/// Owns the key to lane map.
pub struct KeyRouter {
    lanes: HashMap<MemberKey, LaneHandle>,
    sessions: mpsc::Sender<CompletedSession>,
    settings: LaneSettings,
    stats: Arc<PipelineStats>,
    routed_since_prune: usize,
}

impl KeyRouter {
    pub fn new(
        sessions: mpsc::Sender<CompletedSession>,
        settings: LaneSettings,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            lanes: HashMap::new(),
            sessions,
            settings,
            stats,
            routed_since_prune: 0,
        }
    }

    /// Delivers one transition to its key's lane.
    ///
    /// Waits only when that lane's queue is full.
    pub async fn route(&mut self, transition: NormalizedTransition) {
        if transition.is_move() {
            self.stats.record_move_ignored();
            trace!(key = %transition.key(), "move ignored");
            return;
        }

        let key = transition.key();
        let transition = match self.lanes.get(&key) {
            Some(lane) => match lane.sender.send(transition).await {
                Ok(()) => {
                    self.after_route();
                    return;
                }
                Err(SendError(returned)) => returned,
            },
            None => transition,
        };

        let seed = match self.lanes.remove(&key) {
            Some(retired) => LaneSeed::Pending(retired.task),
            None => LaneSeed::Fresh,
        };
        let lane = self.spawn_lane(key.clone(), seed);
        if lane.sender.send(transition).await.is_err() {
            warn!(key = %key, "lane closed before its first transition");
        }
        self.lanes.insert(key, lane);
        self.after_route();
    }

    /// Lanes currently accepting transitions.
    pub fn active_lanes(&self) -> usize {
        self.lanes.values().filter(|lane| !lane.sender.is_closed()).count()
    }

    /// Removes retired lanes from the map. Returns how many were removed.
    ///
    /// A retired lane that ended open (it applied a buffered join while
    /// retiring) is respawned from its final state instead.
    pub fn prune_retired(&mut self) -> usize {
        let retired: Vec<MemberKey> = self
            .lanes
            .iter()
            .filter(|(_, lane)| lane.is_retired())
            .map(|(key, _)| key.clone())
            .collect();

        let mut removed = 0;
        for key in retired {
            let Some(mut lane) = self.lanes.remove(&key) else {
                continue;
            };
            match (&mut lane.task).now_or_never() {
                Some(Ok(state)) if state.is_open() => {
                    let respawned = self.spawn_lane(key.clone(), LaneSeed::State(state));
                    self.lanes.insert(key, respawned);
                }
                Some(Ok(_)) => removed += 1,
                Some(Err(e)) => {
                    warn!(key = %key, error = %e, "lane task failed");
                    removed += 1;
                }
                None => {
                    self.lanes.insert(key, lane);
                }
            }
        }

        if removed > 0 {
            trace!(removed, remaining = self.lanes.len(), "pruned retired lanes");
        }
        removed
    }

    /// Closes every lane and waits for them to finish.
    ///
    /// Open sessions are dropped, not flushed. Returns how many were open.
    pub async fn shutdown(self) -> usize {
        let Self { lanes, sessions, .. } = self;
        drop(sessions);

        let tasks: Vec<(MemberKey, JoinHandle<MemberSessionState>)> = lanes
            .into_iter()
            .map(|(key, lane)| (key, lane.task))
            .collect();

        let mut open = 0;
        for (key, task) in tasks {
            match task.await {
                Ok(state) if state.is_open() => open += 1,
                Ok(_) => {}
                Err(e) => warn!(key = %key, error = %e, "lane task failed during shutdown"),
            }
        }

        debug!(open_sessions_dropped = open, "router stopped");
        open
    }

    fn spawn_lane(&self, key: MemberKey, seed: LaneSeed) -> LaneHandle {
        let (sender, receiver) = mpsc::channel(self.settings.buffer);
        let lane = Lane::new(
            key,
            receiver,
            self.sessions.clone(),
            self.settings,
            Arc::clone(&self.stats),
        );
        LaneHandle {
            sender,
            task: tokio::spawn(lane.run(seed)),
        }
    }

    fn after_route(&mut self) {
        self.routed_since_prune += 1;
        if self.routed_since_prune >= PRUNE_INTERVAL {
            self.routed_since_prune = 0;
            self.prune_retired();
        }
    }
}
