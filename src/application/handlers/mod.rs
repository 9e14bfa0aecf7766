//! Application handlers.
//!
//! Command handlers for the text-message side of activity tracking.

mod delete_message;
mod record_message;

pub use delete_message::{DeleteMessageCommand, DeleteMessageHandler};
pub use record_message::{RecordMessageCommand, RecordMessageHandler, RecordMessageResult};
