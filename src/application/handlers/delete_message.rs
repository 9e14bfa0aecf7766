//! DeleteMessageHandler - Command handler for deleted messages.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MessageId};
use crate::ports::MessageStore;

/// Command to forget a deleted message.
#[derive(Debug, Clone)]
pub struct DeleteMessageCommand {
    pub message_id: MessageId,
}

/// Handler for deleting message rows.
pub struct DeleteMessageHandler {
    store: Arc<dyn MessageStore>,
}

impl DeleteMessageHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Returns the number of rows removed. Unknown ids remove nothing.
    pub async fn handle(&self, cmd: DeleteMessageCommand) -> Result<u64, DomainError> {
        self.store.delete_message(&cmd.message_id).await
    }
}
