//! Pipeline counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::info;

/// Monotonic counters shared by every pipeline stage.
#[derive(Debug, Default)]
pub struct PipelineStats {
    events_received: AtomicU64,
    dropped_by_normalizer: AtomicU64,
    moves_ignored: AtomicU64,
    candidate_sessions: AtomicU64,
    filtered_as_noise: AtomicU64,
    sessions_persisted: AtomicU64,
    persist_failures: AtomicU64,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub events_received: u64,
    pub dropped_by_normalizer: u64,
    pub moves_ignored: u64,
    pub candidate_sessions: u64,
    pub filtered_as_noise: u64,
    pub sessions_persisted: u64,
    pub persist_failures: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped_by_normalizer.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_move_ignored(&self) {
        self.moves_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_candidate(&self) {
        self.candidate_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_noise(&self) {
        self.filtered_as_noise.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persisted(&self) {
        self.sessions_persisted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            dropped_by_normalizer: self.dropped_by_normalizer.load(Ordering::Relaxed),
            moves_ignored: self.moves_ignored.load(Ordering::Relaxed),
            candidate_sessions: self.candidate_sessions.load(Ordering::Relaxed),
            filtered_as_noise: self.filtered_as_noise.load(Ordering::Relaxed),
            sessions_persisted: self.sessions_persisted.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Accepted sessions whose write has completed, successfully or not.
    pub fn sessions_written(&self) -> u64 {
        self.sessions_persisted + self.persist_failures
    }

    pub fn log(&self) {
        info!(
            events_received = self.events_received,
            dropped_by_normalizer = self.dropped_by_normalizer,
            moves_ignored = self.moves_ignored,
            candidate_sessions = self.candidate_sessions,
            filtered_as_noise = self.filtered_as_noise,
            sessions_persisted = self.sessions_persisted,
            persist_failures = self.persist_failures,
            "attendance pipeline stats"
        );
    }
}
