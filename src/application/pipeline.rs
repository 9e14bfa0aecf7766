//! AttendancePipeline - raw presence events in, stored sessions out.
//!
//! ```text
//! raw event -> normalizer -> router -> lane (state machine + noise filter) -> sink -> store
//! ```
//!
//! Ingestion is sequential; parallelism comes from one lane per key and from
//! the sink running writes concurrently.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::lane::LaneSettings;
use super::router::KeyRouter;
use super::sink::SessionSink;
use super::stats::{PipelineStats, StatsSnapshot};
use crate::config::TrackingConfig;
use crate::domain::presence::{RawTransitionEvent, TransitionNormalizer};
use crate::ports::SessionStore;

pub struct AttendancePipeline {
    normalizer: TransitionNormalizer,
    router: KeyRouter,
    sink_worker: JoinHandle<()>,
    stats: Arc<PipelineStats>,
}

impl AttendancePipeline {
    /// Builds the pipeline and starts its sink worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn SessionStore>, config: &TrackingConfig) -> Self {
        let stats = Arc::new(PipelineStats::new());
        let (sessions_tx, sessions_rx) = mpsc::channel(config.sink_buffer);
        let sink = Arc::new(SessionSink::new(store, Arc::clone(&stats)));
        let sink_worker = sink.spawn(sessions_rx);

        let settings = LaneSettings {
            noise_filter: config.noise_filter(),
            idle_timeout: config.lane_idle_timeout(),
            buffer: config.lane_buffer,
        };

        Self {
            normalizer: TransitionNormalizer::new(),
            router: KeyRouter::new(sessions_tx, settings, Arc::clone(&stats)),
            sink_worker,
            stats,
        }
    }

    /// Feeds one raw presence event.
    pub async fn ingest(&mut self, raw: RawTransitionEvent) {
        self.stats.record_received();
        match self.normalizer.normalize(raw) {
            Some(transition) => self.router.route(transition).await,
            None => {
                self.stats.record_dropped();
                trace!("raw event dropped by normalizer");
            }
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn active_lanes(&self) -> usize {
        self.router.active_lanes()
    }

    /// Stops every lane, waits for pending writes and logs final counters.
    pub async fn shutdown(self) -> StatsSnapshot {
        self.router.shutdown().await;
        if let Err(e) = self.sink_worker.await {
            warn!(error = %e, "session sink worker failed");
        }

        let snapshot = self.stats.snapshot();
        snapshot.log();
        snapshot
    }
}
