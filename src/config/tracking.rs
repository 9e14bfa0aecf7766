//! Attendance tracking configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::attendance::{NoiseFilter, DEFAULT_MIN_SESSION_SECS};

/// Tuning for session reconstruction and the per-key lanes
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Sessions this long or shorter are discarded as flicker
    #[serde(default = "default_min_session_secs")]
    pub min_session_secs: u64,

    /// A closed lane with no events for this long is retired
    #[serde(default = "default_lane_idle_timeout")]
    pub lane_idle_timeout_secs: u64,

    /// Per-lane event queue capacity
    #[serde(default = "default_lane_buffer")]
    pub lane_buffer: usize,

    /// Queue capacity between lanes and the session sink
    #[serde(default = "default_sink_buffer")]
    pub sink_buffer: usize,
}

impl TrackingConfig {
    pub fn noise_filter(&self) -> NoiseFilter {
        NoiseFilter::from_secs(self.min_session_secs)
    }

    pub fn lane_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.lane_idle_timeout_secs)
    }

    /// Validate tracking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lane_idle_timeout_secs == 0 {
            return Err(ValidationError::InvalidIdleTimeout);
        }
        if self.lane_buffer == 0 || self.sink_buffer == 0 {
            return Err(ValidationError::InvalidBufferSize);
        }
        Ok(())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_session_secs: default_min_session_secs(),
            lane_idle_timeout_secs: default_lane_idle_timeout(),
            lane_buffer: default_lane_buffer(),
            sink_buffer: default_sink_buffer(),
        }
    }
}

fn default_min_session_secs() -> u64 {
    DEFAULT_MIN_SESSION_SECS
}

fn default_lane_idle_timeout() -> u64 {
    900
}

fn default_lane_buffer() -> usize {
    64
}

fn default_sink_buffer() -> usize {
    1024
}
