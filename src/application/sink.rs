//! Session sink - hands accepted sessions to storage.
//!
//! Lanes push sessions into a bounded channel; the sink worker spawns one
//! write per session so a slow database never stalls a lane. Failed writes
//! are logged and dropped. When every sender is gone the worker waits for
//! in-flight writes before exiting.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, trace, warn};

use super::stats::PipelineStats;
use crate::domain::attendance::CompletedSession;
use crate::ports::SessionStore;

/// Writes accepted sessions to a [`SessionStore`].
pub struct SessionSink {
    store: Arc<dyn SessionStore>,
    stats: Arc<PipelineStats>,
}

impl SessionSink {
    pub fn new(store: Arc<dyn SessionStore>, stats: Arc<PipelineStats>) -> Self {
        Self { store, stats }
    }

    /// Persists one session. Returns whether the write succeeded.
    pub async fn persist(&self, session: &CompletedSession) -> bool {
        match self.store.insert_session(session).await {
            Ok(()) => {
                self.stats.record_persisted();
                trace!(
                    user_id = %session.user_id(),
                    guild_id = %session.guild_id(),
                    duration_secs = session.duration().num_seconds(),
                    "session stored"
                );
                true
            }
            Err(e) => {
                self.stats.record_persist_failure();
                error!(
                    user_id = %session.user_id(),
                    guild_id = %session.guild_id(),
                    ts_in = %session.join_timestamp().as_datetime(),
                    ts_out = %session.leave_timestamp().as_datetime(),
                    error = %e,
                    "failed to store session"
                );
                false
            }
        }
    }

    /// Starts the worker that drains `sessions` until every sender is dropped.
    pub fn spawn(self: Arc<Self>, mut sessions: mpsc::Receiver<CompletedSession>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut writes = JoinSet::new();

            loop {
                tokio::select! {
                    Some(session) = sessions.recv() => {
                        let sink = Arc::clone(&self);
                        writes.spawn(async move {
                            sink.persist(&session).await;
                        });
                    }
                    Some(joined) = writes.join_next(), if !writes.is_empty() => {
                        if let Err(e) = joined {
                            warn!(error = %e, "session write task failed");
                        }
                    }
                    else => break,
                }
            }

            while let Some(joined) = writes.join_next().await {
                if let Err(e) = joined {
                    warn!(error = %e, "session write task failed");
                }
            }
        })
    }
}
