//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionStore` - Durable writes for accepted attendance sessions
//! - `MessageStore` - Message ingestion writes and deletes
//! - `ActivityReader` - Aggregate queries for reporting

mod activity_reader;
mod message_store;
mod session_store;

pub use activity_reader::ActivityReader;
pub use message_store::MessageStore;
pub use session_store::SessionStore;
