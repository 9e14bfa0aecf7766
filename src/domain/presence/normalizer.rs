//! Transition normalizer.
//!
//! Pure mapping from a raw voice-state notification to zero or one
//! [`NormalizedTransition`]. Events from automated participants and events
//! that carry no presence information produce nothing.

use super::{NormalizedTransition, RawTransitionEvent, TransitionKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionNormalizer;

impl TransitionNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes one raw event.
    ///
    /// `was_present` is set iff a previous channel is present, `is_present`
    /// iff a next channel is present. An update that stays in the same channel
    /// is classified as a move.
    pub fn normalize(&self, raw: RawTransitionEvent) -> Option<NormalizedTransition> {
        if raw.is_bot {
            return None;
        }

        let kind = TransitionKind::from_presence(
            raw.previous_channel_id.is_some(),
            raw.next_channel_id.is_some(),
        )?;

        Some(NormalizedTransition::new(
            raw.timestamp,
            raw.member_id,
            raw.guild_id,
            kind,
        ))
    }
}
