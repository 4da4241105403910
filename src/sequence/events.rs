//! Per-sequence events
//!
//! Emitted synchronously in the order the state changes happen, and
//! collected by whoever owns the sequence.

use serde::{Deserialize, Serialize};

/// Something that happened to one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceEvent {
    /// Text or progress changed
    TextUpdated,
    /// A token advanced the sequence
    InputAccepted,
    /// A token did not match
    InputRejected,
    /// The last character was accepted
    Completed,
    /// Joined the target set
    Targeted,
    /// Left the target set
    Untargeted,
    /// About to be destroyed
    Removal,
}
