//! MessageStore port - stateless one-row-per-message persistence.

use async_trait::async_trait;

use crate::domain::activity::MessageRecord;
use crate::domain::foundation::{DomainError, MessageId};

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert one message row.
    async fn insert_message(&self, record: &MessageRecord) -> Result<(), DomainError>;

    /// Delete every row recorded for a message id.
    ///
    /// Returns the number of rows removed; zero is not an error.
    async fn delete_message(&self, message_id: &MessageId) -> Result<u64, DomainError>;
}
