//! Gateway feed adapters.
//!
//! - `event_stream` - Line-delimited JSON events from any async reader
//! - `stdin_stream` / `file_stream` - Convenience constructors for the binary

mod json_lines;

pub use json_lines::{event_stream, file_stream, parse_line, stdin_stream, GatewayEvent};
