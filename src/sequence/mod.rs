//! Sequence Module
//!
//! The per-string matching automaton: one target text, a progress cursor,
//! the cached set of acceptable inputs, and the events it emits.

mod events;
mod matcher;

pub use events::SequenceEvent;
pub use matcher::{Sequence, SequenceOptions};
