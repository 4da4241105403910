//! Registry-level events and sequence identity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sequence::SequenceEvent;

/// Handle to a sequence owned by a registry
///
/// Allocated by the registry on registration, never reused within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events produced while the registry works, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// An event emitted by one sequence, forwarded as it happened
    Sequence { id: SequenceId, event: SequenceEvent },
    /// A targeted sequence accepted the token
    InputAccepted { id: SequenceId, input: char },
    /// The token was rejected. `id` is `None` when no sequence could be
    /// targeted with it.
    InputRejected { id: Option<SequenceId>, input: char },
    /// A sequence was typed to completion and unregistered
    SequenceCompleted { id: SequenceId, text: String },
    /// A token finished dispatching, once per keystroke whatever the number
    /// of targets. `accepted` is true if any target took it.
    InputProcessed { input: char, accepted: bool },
}

impl Event {
    /// The sequence this event concerns, if any
    pub fn sequence_id(&self) -> Option<SequenceId> {
        match self {
            Event::Sequence { id, .. }
            | Event::InputAccepted { id, .. }
            | Event::SequenceCompleted { id, .. } => Some(*id),
            Event::InputRejected { id, .. } => *id,
            Event::InputProcessed { .. } => None,
        }
    }

    /// True for the events aggregated across all sequences
    pub fn is_registry_level(&self) -> bool {
        !matches!(self, Event::Sequence { .. })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Sequence { id, event } => write!(f, "{} {:?}", id, event),
            Event::InputAccepted { id, input } => write!(f, "accepted {:?} by {}", input, id),
            Event::InputRejected { id: Some(id), input } => {
                write!(f, "rejected {:?} by {}", input, id)
            },
            Event::InputRejected { id: None, input } => write!(f, "rejected {:?}", input),
            Event::SequenceCompleted { id, text } => write!(f, "completed {} {:?}", id, text),
            Event::InputProcessed { input, accepted: true } => write!(f, "typed {:?}", input),
            Event::InputProcessed { input, accepted: false } => write!(f, "mistyped {:?}", input),
        }
    }
}
