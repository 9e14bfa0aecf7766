//! Presence module - voice-state transitions and their normalization.

mod normalizer;
mod raw;
mod transition;

pub use normalizer::TransitionNormalizer;
pub use raw::RawTransitionEvent;
pub use transition::{NormalizedTransition, TransitionKind};
