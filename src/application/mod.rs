//! Application layer - the running attendance pipeline and message handlers.
//!
//! This layer orchestrates domain logic and coordinates between ports:
//! - `AttendancePipeline` wires normalizer, per-key router, lanes and sink
//! - `ActivityService` drives a gateway feed through the pipeline and handlers
//! - `handlers` record and delete text messages

pub mod handlers;

mod lane;
mod pipeline;
mod router;
mod service;
mod sink;
mod stats;

pub use handlers::{
    DeleteMessageCommand, DeleteMessageHandler, RecordMessageCommand, RecordMessageHandler,
    RecordMessageResult,
};
pub use lane::{Lane, LaneSeed, LaneSettings};
pub use pipeline::AttendancePipeline;
pub use router::KeyRouter;
pub use service::ActivityService;
pub use sink::SessionSink;
pub use stats::{PipelineStats, StatsSnapshot};
