//! Sequence registry and per-tick dispatch
//!
//! The registry owns every live sequence and decides which of them receive
//! the tick's tokens. While nothing is targeted, each token first probes
//! the sequences in registration order and targets the first one (or, in
//! multi-target mode, every one) that accepts it. Targeted sequences then
//! receive the token in target order.

use super::events::{Event, SequenceId};
use crate::sequence::Sequence;

#[derive(Debug)]
struct Entry {
    id: SequenceId,
    sequence: Sequence,
}

/// Owner and dispatcher of the live sequences of one matching session
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    /// Live sequences in registration order
    entries: Vec<Entry>,
    /// Targeted subset of `entries`, in targeting order
    targeted: Vec<SequenceId>,
    multi_target: bool,
    next_id: u64,
    latest_processed_input: Option<char>,
    /// Tick of the last dispatch pass
    last_processed_tick: Option<u64>,
    events: Vec<Event>,
}

impl SequenceRegistry {
    pub fn new(multi_target: bool) -> Self {
        Self {
            multi_target,
            ..Self::default()
        }
    }

    pub fn is_multi_target(&self) -> bool {
        self.multi_target
    }

    /// Switch targeting discipline
    ///
    /// Leaving multi-target mode keeps only the earliest target.
    pub fn set_multi_target(&mut self, multi_target: bool) {
        self.multi_target = multi_target;
        if !multi_target {
            let extra: Vec<SequenceId> = self.targeted.iter().skip(1).copied().collect();
            for id in extra {
                self.untarget_sequence(id);
            }
        }
    }

    /// Take ownership of a sequence so it can receive input
    ///
    /// A sequence with nothing left to type completes on the spot and is
    /// not kept.
    pub fn register(&mut self, sequence: Sequence) -> SequenceId {
        self.next_id += 1;
        let id = SequenceId(self.next_id);
        self.entries.push(Entry { id, sequence });
        self.forward_events(self.entries.len() - 1);
        tracing::trace!(%id, "registered sequence");
        self.complete_if_done(self.entries.len() - 1);
        id
    }

    /// Stop feeding input to a sequence and hand it back, untargeted
    pub fn unregister(&mut self, id: SequenceId) -> Option<Sequence> {
        let index = self.index_of(id)?;
        if self.targeted.contains(&id) {
            self.targeted.retain(|&t| t != id);
            self.entries[index].sequence.set_targeted(false);
        }
        let mut entry = self.entries.remove(index);
        self.events.extend(
            entry
                .sequence
                .take_events()
                .into_iter()
                .map(|event| Event::Sequence { id, event }),
        );
        Some(entry.sequence)
    }

    /// Destroy a sequence, emitting its removal event first
    pub fn remove(&mut self, id: SequenceId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.entries[index].sequence.mark_removed();
        self.forward_events(index);
        self.unregister(id).is_some()
    }

    /// Destroy every live sequence
    pub fn remove_all(&mut self) {
        let ids: Vec<SequenceId> = self.entries.iter().map(|e| e.id).collect();
        for id in ids {
            self.remove(id);
        }
        self.entries.clear();
        self.targeted.clear();
    }

    /// Add a sequence to the target set
    ///
    /// In single-target mode every existing target is untargeted first.
    /// Returns false if the sequence is unknown or already targeted.
    pub fn target_sequence(&mut self, id: SequenceId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.targeted.contains(&id) {
            return false;
        }
        if !self.multi_target {
            self.clear_targets();
        }
        self.targeted.push(id);
        self.entries[index].sequence.set_targeted(true);
        self.forward_events(index);
        tracing::debug!(%id, "targeted sequence");
        true
    }

    /// Remove a sequence from the target set
    pub fn untarget_sequence(&mut self, id: SequenceId) -> bool {
        if !self.targeted.contains(&id) {
            return false;
        }
        self.targeted.retain(|&t| t != id);
        if let Some(index) = self.index_of(id) {
            self.entries[index].sequence.set_targeted(false);
            self.forward_events(index);
        }
        true
    }

    /// Untarget every targeted sequence
    pub fn clear_targets(&mut self) {
        let snapshot = self.targeted.clone();
        for id in snapshot {
            self.untarget_sequence(id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: SequenceId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: SequenceId) -> Option<&Sequence> {
        self.index_of(id).map(|i| &self.entries[i].sequence)
    }

    /// Live sequences in registration order
    pub fn sequences(&self) -> impl Iterator<Item = (SequenceId, &Sequence)> {
        self.entries.iter().map(|e| (e.id, &e.sequence))
    }

    /// Targeted sequences in targeting order
    pub fn targeted(&self) -> &[SequenceId] {
        &self.targeted
    }

    /// Sequences eligible for input: the targets, or everything when
    /// nothing is targeted
    pub fn receiving(&self) -> Vec<SequenceId> {
        if self.targeted.is_empty() {
            self.entries.iter().map(|e| e.id).collect()
        } else {
            self.targeted.clone()
        }
    }

    /// Union of the acceptable inputs of the receiving sequences
    pub fn acceptable_inputs(&self) -> Vec<char> {
        let mut inputs = Vec::new();
        for id in self.receiving() {
            if let Some(sequence) = self.get(id) {
                for &c in sequence.acceptable_inputs() {
                    if !inputs.contains(&c) {
                        inputs.push(c);
                    }
                }
            }
        }
        inputs
    }

    /// Replace a sequence's text, resetting its progress
    ///
    /// An empty text completes the sequence.
    pub fn set_text(&mut self, id: SequenceId, text: impl Into<String>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.entries[index].sequence.set_text(text);
        self.forward_events(index);
        self.complete_if_done(index);
        true
    }

    /// Reset a sequence's progress
    pub fn reset(&mut self, id: SequenceId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.entries[index].sequence.reset();
        self.forward_events(index);
        true
    }

    /// The last token dispatched
    pub fn latest_processed_input(&self) -> Option<char> {
        self.latest_processed_input
    }

    /// Events emitted so far and not yet drained
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch this tick's tokens, at most once per tick
    ///
    /// Returns false if a pass already ran for `tick`.
    pub fn process_input(&mut self, tick: u64, tokens: &[char]) -> bool {
        if self.last_processed_tick == Some(tick) {
            return false;
        }
        self.last_processed_tick = Some(tick);
        self.dispatch(tokens);
        true
    }

    fn dispatch(&mut self, tokens: &[char]) {
        if self.entries.is_empty() {
            return;
        }

        for &token in tokens {
            tracing::trace!(?token, "dispatching token");
            self.latest_processed_input = Some(token);
            if self.targeted.is_empty() {
                self.acquire_target(token);
            }

            // Completion unregisters mid-loop; iterate a snapshot
            let snapshot = self.targeted.clone();
            let mut accepted = false;
            for id in snapshot {
                let Some(index) = self.index_of(id) else {
                    continue;
                };
                if self.entries[index].sequence.is_completed() {
                    continue;
                }
                if self.send_input(index, token) {
                    accepted = true;
                } else if !self.multi_target {
                    break;
                }
            }
            self.events.push(Event::InputProcessed { input: token, accepted });
        }
    }

    fn acquire_target(&mut self, token: char) {
        let candidates: Vec<SequenceId> = self
            .entries
            .iter()
            .filter(|e| e.sequence.does_accept_input(token))
            .map(|e| e.id)
            .collect();

        if candidates.is_empty() {
            self.events.push(Event::InputRejected { id: None, input: token });
            return;
        }

        for id in candidates {
            self.target_sequence(id);
            if !self.multi_target {
                break;
            }
        }
    }

    fn send_input(&mut self, index: usize, token: char) -> bool {
        let id = self.entries[index].id;
        let accepted = self.entries[index].sequence.receive_input(token);
        self.forward_events(index);

        if !accepted {
            self.events.push(Event::InputRejected {
                id: Some(id),
                input: token,
            });
            return false;
        }

        self.events.push(Event::InputAccepted { id, input: token });
        self.complete_if_done(index);
        true
    }

    fn complete_if_done(&mut self, index: usize) {
        let entry = &self.entries[index];
        if !entry.sequence.is_completed() {
            return;
        }
        let id = entry.id;
        let text = entry.sequence.text().to_string();
        tracing::debug!(%id, %text, "sequence completed");
        self.events.push(Event::SequenceCompleted { id, text });
        self.unregister(id);
    }

    fn index_of(&self, id: SequenceId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn forward_events(&mut self, index: usize) {
        let entry = &mut self.entries[index];
        let id = entry.id;
        self.events.extend(
            entry
                .sequence
                .take_events()
                .into_iter()
                .map(|event| Event::Sequence { id, event }),
        );
    }
}
