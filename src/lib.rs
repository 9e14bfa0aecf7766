//! VC Attendance - Voice-channel attendance tracking
//!
//! Reconstructs bounded attendance sessions from a stream of voice-presence
//! transitions, discards short flicker sessions and persists the rest. Text
//! message activity is recorded alongside for reporting.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
