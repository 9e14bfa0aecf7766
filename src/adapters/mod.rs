//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - PostgreSQL-backed storage ports
//! - `storage` - In-memory storage ports for tests and dry runs
//! - `gateway` - JSON-lines relay of gateway events

pub mod gateway;
pub mod postgres;
pub mod storage;

pub use gateway::GatewayEvent;
pub use storage::InMemoryActivityStore;
