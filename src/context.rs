//! Matching Context
//!
//! Ties together the frame source and the sequence registry of one matching
//! session. This is the main integration point for a host game: call
//! `process_input` once or more per tick, then drain the events.
//!
//! Independent sessions (split-screen, say) use independent contexts. A
//! multi-threaded host must serialize access to a context itself, for
//! example by holding it behind a `Mutex` for the duration of a tick.

use crate::app::MatchingConfig;
use crate::input::{FrameSource, InputBackend};
use crate::registry::{Event, SequenceId, SequenceRegistry};
use crate::sequence::{Sequence, SequenceOptions};

/// One matching session
#[derive(Debug)]
pub struct MatchingContext {
    config: MatchingConfig,
    frames: FrameSource,
    registry: SequenceRegistry,
}

impl Default for MatchingContext {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl MatchingContext {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            frames: FrameSource::new(config.input),
            registry: SequenceRegistry::new(config.multi_target),
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn registry(&self) -> &SequenceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SequenceRegistry {
        &mut self.registry
    }

    pub fn frames(&self) -> &FrameSource {
        &self.frames
    }

    /// Create and register a sequence with the configured default options
    pub fn spawn(&mut self, text: impl Into<String>) -> SequenceId {
        self.spawn_with(text, self.config.sequence)
    }

    /// Create and register a sequence with explicit options
    pub fn spawn_with(&mut self, text: impl Into<String>, options: SequenceOptions) -> SequenceId {
        self.registry.register(Sequence::with_options(text, options))
    }

    pub fn sequence(&self, id: SequenceId) -> Option<&Sequence> {
        self.registry.get(id)
    }

    pub fn target(&mut self, id: SequenceId) -> bool {
        self.registry.target_sequence(id)
    }

    pub fn untarget(&mut self, id: SequenceId) -> bool {
        self.registry.untarget_sequence(id)
    }

    pub fn remove(&mut self, id: SequenceId) -> bool {
        self.registry.remove(id)
    }

    /// Wipe the board
    pub fn remove_all(&mut self) {
        self.registry.remove_all();
    }

    /// Inject input as if typed, e.g. from an on-screen keyboard
    pub fn add_input<B: InputBackend + ?Sized>(&mut self, backend: &B, text: &str) {
        self.frames.add_input(backend, text);
    }

    /// Tokens received during the backend's current tick
    pub fn received_inputs<B: InputBackend + ?Sized>(&mut self, backend: &B) -> &[char] {
        self.frames.received_inputs(backend)
    }

    /// Per-tick entry point
    ///
    /// Derives the tick's tokens and dispatches them. Further calls within
    /// the same tick are no-ops; returns whether a dispatch pass ran.
    pub fn process_input<B: InputBackend + ?Sized>(&mut self, backend: &B) -> bool {
        let tick = backend.tick();
        let tokens = self.frames.received_inputs(backend);
        self.registry.process_input(tick, tokens)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.registry.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawFrame;

    #[test]
    fn test_context_types_word() {
        let mut context = MatchingContext::default();
        let id = context.spawn("hi");

        assert!(context.process_input(&RawFrame::typed(1, "h")));
        assert!(context.sequence(id).is_some_and(Sequence::is_targeted));
        context.process_input(&RawFrame::typed(2, "i"));
        assert!(context.sequence(id).is_none());

        let completed = context
            .drain_events()
            .into_iter()
            .any(|e| matches!(e, Event::SequenceCompleted { id: done, .. } if done == id));
        assert!(completed);
    }

    #[test]
    fn test_repeated_calls_in_one_tick() {
        let mut context = MatchingContext::default();
        let id = context.spawn("aaaa");
        let frame = RawFrame::typed(1, "a");

        assert!(context.process_input(&frame));
        for _ in 0..5 {
            assert!(!context.process_input(&frame));
        }
        assert_eq!(context.sequence(id).map(Sequence::progress), Some(1));
    }

    #[test]
    fn test_virtual_input_dispatched() {
        let mut context = MatchingContext::default();
        let id = context.spawn("abc");
        let frame = RawFrame::idle(1);

        context.add_input(&frame, "ab");
        context.process_input(&frame);
        assert_eq!(context.sequence(id).map(Sequence::progress), Some(2));
    }

    #[test]
    fn test_spawn_uses_configured_options() {
        let mut config = MatchingConfig::default();
        config.sequence.case_sensitive = true;
        let mut context = MatchingContext::new(config);
        let id = context.spawn("A");

        context.process_input(&RawFrame::typed(1, "a"));
        assert_eq!(context.sequence(id).map(Sequence::progress), Some(0));
        context.process_input(&RawFrame::typed(2, "A"));
        assert!(context.sequence(id).is_none());
    }

    #[test]
    fn test_independent_contexts() {
        let mut left = MatchingContext::default();
        let mut right = MatchingContext::default();
        let l = left.spawn("ab");
        let r = right.spawn("ab");

        left.process_input(&RawFrame::typed(1, "a"));
        assert_eq!(left.sequence(l).map(Sequence::progress), Some(1));
        assert_eq!(right.sequence(r).map(Sequence::progress), Some(0));
    }

    #[test]
    fn test_remove_all() {
        let mut context = MatchingContext::default();
        context.spawn("a");
        context.spawn("b");
        context.remove_all();
        assert!(context.registry().is_empty());
    }
}
