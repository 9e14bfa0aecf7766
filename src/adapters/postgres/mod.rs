//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresSessionStore` - Writes accepted sessions to `vc`
//! - `PostgresMessageStore` - Writes and deletes rows in `msgs`
//! - `PostgresActivityReader` - Aggregate queries over both tables
//! - `connect` / `run_migrations` - Pool setup and schema management

mod activity_reader;
mod message_store;
mod pool;
mod session_store;

pub use activity_reader::PostgresActivityReader;
pub use message_store::PostgresMessageStore;
pub use pool::{connect, run_migrations};
pub use session_store::PostgresSessionStore;
