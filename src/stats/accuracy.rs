//! Accepted/rejected input accounting

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::Event;

/// Counts for one input character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharStatistics {
    pub accepted: u32,
    pub rejected: u32,
}

impl CharStatistics {
    pub fn total(&self) -> u32 {
        self.accepted + self.rejected
    }
}

/// Accuracy statistics gathered from registry events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputStatistics {
    accepted: u32,
    rejected: u32,
    per_char: BTreeMap<char, CharStatistics>,
}

impl InputStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one event
    ///
    /// Only `InputProcessed` counts, so a keystroke broadcast to several
    /// targets is counted once.
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::InputProcessed { input, accepted: true } => {
                self.accepted += 1;
                self.per_char.entry(*input).or_default().accepted += 1;
            },
            Event::InputProcessed { input, accepted: false } => {
                self.rejected += 1;
                self.per_char.entry(*input).or_default().rejected += 1;
            },
            Event::Sequence { .. }
            | Event::InputAccepted { .. }
            | Event::InputRejected { .. }
            | Event::SequenceCompleted { .. } => {},
        }
    }

    /// Account for a batch of events
    pub fn record_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    pub fn total(&self) -> u32 {
        self.accepted + self.rejected
    }

    /// Fraction of accepted inputs; 1.0 before anything was typed
    pub fn accuracy(&self) -> f32 {
        if self.total() == 0 {
            1.0
        } else {
            self.accepted as f32 / self.total() as f32
        }
    }

    /// Counts for a single character
    pub fn char_stats(&self, input: char) -> CharStatistics {
        self.per_char.get(&input).copied().unwrap_or_default()
    }

    /// Every character seen, in character order
    pub fn chars(&self) -> impl Iterator<Item = (char, CharStatistics)> + '_ {
        self.per_char.iter().map(|(c, s)| (*c, *s))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
