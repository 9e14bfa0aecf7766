//! ActivityService - drives the gateway feed through both tracking paths.
//!
//! Voice-state updates go to the attendance pipeline, message events to the
//! message handlers. The loop ends when the feed is exhausted or a shutdown
//! signal arrives; either way the pipeline is shut down cleanly.

use futures::stream::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::{info, warn};

use super::handlers::{
    DeleteMessageCommand, DeleteMessageHandler, RecordMessageCommand, RecordMessageHandler,
};
use super::pipeline::AttendancePipeline;
use super::stats::StatsSnapshot;
use crate::adapters::GatewayEvent;

pub struct ActivityService {
    pipeline: AttendancePipeline,
    record_message: RecordMessageHandler,
    delete_message: DeleteMessageHandler,
}

impl ActivityService {
    pub fn new(
        pipeline: AttendancePipeline,
        record_message: RecordMessageHandler,
        delete_message: DeleteMessageHandler,
    ) -> Self {
        Self {
            pipeline,
            record_message,
            delete_message,
        }
    }

    /// Handles one gateway event. Storage failures are logged, never raised.
    pub async fn dispatch(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::VoiceStateUpdate(raw) => self.pipeline.ingest(raw).await,
            GatewayEvent::MessageCreate(message) => {
                let message_id = message.message_id.clone();
                if let Err(e) = self
                    .record_message
                    .handle(RecordMessageCommand { message })
                    .await
                {
                    warn!(message_id = %message_id, error = %e, "failed to record message");
                }
            }
            GatewayEvent::MessageDelete(message_id) => {
                let cmd = DeleteMessageCommand {
                    message_id: message_id.clone(),
                };
                if let Err(e) = self.delete_message.handle(cmd).await {
                    warn!(message_id = %message_id, error = %e, "failed to delete message");
                }
            }
        }
    }

    /// Runs until `events` ends or `shutdown` flips to `true`.
    pub async fn run<S>(mut self, events: S, mut shutdown: watch::Receiver<bool>) -> StatsSnapshot
    where
        S: Stream<Item = GatewayEvent> + Send,
    {
        futures::pin_mut!(events);
        let mut signal_closed = false;

        loop {
            tokio::select! {
                changed = shutdown.changed(), if !signal_closed => {
                    if changed.is_err() {
                        signal_closed = true;
                    } else if *shutdown.borrow() {
                        info!("shutdown requested");
                        break;
                    }
                }
                next = events.next() => match next {
                    Some(event) => self.dispatch(event).await,
                    None => {
                        info!("gateway feed ended");
                        break;
                    }
                },
            }
        }

        self.pipeline.shutdown().await
    }
}
