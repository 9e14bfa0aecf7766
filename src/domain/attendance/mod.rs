//! Attendance module - turning presence transitions into sessions.
//!
//! - `MemberKey` - the `(guild, member)` partition key
//! - `MemberSessionState` - per-key CLOSED/OPEN state machine
//! - `NoiseFilter` - drops sessions too short to count as attendance
//! - `CompletedSession` - the record handed to storage

mod key;
mod noise_filter;
mod session;
mod tracker;

pub use key::MemberKey;
pub use noise_filter::{NoiseFilter, DEFAULT_MIN_SESSION_SECS};
pub use session::CompletedSession;
pub use tracker::{MemberSessionState, SessionPhase};
