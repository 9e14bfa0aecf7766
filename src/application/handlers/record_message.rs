//! RecordMessageHandler - Command handler for incoming text messages.

use std::sync::Arc;

use tracing::trace;

use crate::domain::activity::{MessageRecord, RawMessage};
use crate::domain::foundation::DomainError;
use crate::ports::MessageStore;

/// Command to record one incoming message.
#[derive(Debug, Clone)]
pub struct RecordMessageCommand {
    pub message: RawMessage,
}

/// What happened to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordMessageResult {
    Stored(MessageRecord),
    /// Bot author or empty content.
    Untracked,
    /// Starts with the command prefix.
    Command,
}

/// Handler for recording messages.
pub struct RecordMessageHandler {
    store: Arc<dyn MessageStore>,
    command_prefix: String,
}

impl RecordMessageHandler {
    pub fn new(store: Arc<dyn MessageStore>, command_prefix: impl Into<String>) -> Self {
        Self {
            store,
            command_prefix: command_prefix.into(),
        }
    }

    pub async fn handle(&self, cmd: RecordMessageCommand) -> Result<RecordMessageResult, DomainError> {
        let message = cmd.message;

        if !message.is_trackable() {
            return Ok(RecordMessageResult::Untracked);
        }
        if message.is_command(&self.command_prefix) {
            trace!(message_id = %message.message_id, "command message not recorded");
            return Ok(RecordMessageResult::Command);
        }

        let record = MessageRecord::from(message);
        self.store.insert_message(&record).await?;
        Ok(RecordMessageResult::Stored(record))
    }
}
