//! Storage Adapters
//!
//! In-process implementations of the storage ports.
//!
//! - **InMemoryActivityStore** - Sessions and messages in memory (testing/dry runs)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryActivityStore;
//!
//! let store = Arc::new(InMemoryActivityStore::new());
//! let sink = SessionSink::new(store.clone());
//! ```

mod in_memory_activity_store;

pub use in_memory_activity_store::InMemoryActivityStore;
