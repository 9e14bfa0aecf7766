//! Activity module - text-message records and aggregate activity views.

mod message;
mod summary;

pub use message::{MessageRecord, RawMessage};
pub use summary::{
    format_hours_minutes, MessageActivitySummary, MessageSample, VoiceActivitySummary,
};
