//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamp, errors, state machine)
//! - `presence` - Raw voice-state transitions and their normalization
//! - `attendance` - Per-member session tracking and noise filtering
//! - `activity` - Message records and aggregate activity views

pub mod activity;
pub mod attendance;
pub mod foundation;
pub mod presence;
