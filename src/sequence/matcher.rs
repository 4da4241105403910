//! Sequence matching automaton
//!
//! A `Sequence` is one target text plus a progress cursor. Each token is
//! tested at the cursor; with optional whitespace enabled a token that
//! misses the cursor is retried at the next non-whitespace character, so
//! spaces may be skipped but required characters never are.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::events::SequenceEvent;
use crate::input::{case_variants, inputs_equal, is_whitespace};

/// Matching-mode flags, fixed for the lifetime of a sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Regard case when accepting input
    pub case_sensitive: bool,
    /// Whitespace may be skipped; the next non-whitespace character is also acceptable
    pub optional_whitespace: bool,
}

/// A single target text and its matching progress
#[derive(Debug, Clone)]
pub struct Sequence {
    text: String,
    /// `text` split into characters; progress indexes into this
    chars: Vec<char>,
    /// Number of accepted characters, `0..=chars.len()`
    progress: usize,
    options: SequenceOptions,
    targeted: bool,
    last_processed_input: Option<char>,
    /// Acceptable inputs for the current progress. Empty cell means dirty.
    acceptable: OnceCell<Vec<char>>,
    events: Vec<SequenceEvent>,
}

impl Sequence {
    /// Create a sequence with default options
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_options(text, SequenceOptions::default())
    }

    /// Create a sequence with the given options
    pub fn with_options(text: impl Into<String>, options: SequenceOptions) -> Self {
        let mut sequence = Self {
            text: String::new(),
            chars: Vec::new(),
            progress: 0,
            options,
            targeted: false,
            last_processed_input: None,
            acceptable: OnceCell::new(),
            events: Vec::new(),
        };
        sequence.set_text(text);
        sequence
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and reset progress
    ///
    /// With optional whitespace the text is trimmed first.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if self.options.optional_whitespace {
            text.trim().to_string()
        } else {
            text
        };
        self.chars = self.text.chars().collect();
        self.reset();
    }

    /// Reset progress to the start of the text
    pub fn reset(&mut self) {
        self.progress = 0;
        self.acceptable.take();
        self.events.push(SequenceEvent::TextUpdated);
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Number of characters in the text
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True once every character has been accepted. An empty text is
    /// complete from the start.
    pub fn is_completed(&self) -> bool {
        self.progress >= self.chars.len()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.options.case_sensitive
    }

    pub fn has_optional_whitespace(&self) -> bool {
        self.options.optional_whitespace
    }

    pub fn options(&self) -> SequenceOptions {
        self.options
    }

    pub fn is_targeted(&self) -> bool {
        self.targeted
    }

    /// The last token fed in, accepted or not
    pub fn last_processed_input(&self) -> Option<char> {
        self.last_processed_input
    }

    /// The portion of the text accepted so far
    pub fn completed_text(&self) -> String {
        self.chars[..self.progress].iter().collect()
    }

    /// The portion of the text still to be typed
    pub fn remaining_text(&self) -> String {
        self.chars[self.progress..].iter().collect()
    }

    /// Tokens that would currently advance the sequence
    ///
    /// Computed on first use and cached until progress or text changes.
    pub fn acceptable_inputs(&self) -> &[char] {
        self.acceptable.get_or_init(|| self.evaluate_acceptable_inputs())
    }

    /// Returns true if `token` would be accepted by `receive_input`
    pub fn does_accept_input(&self, token: char) -> bool {
        self.acceptable_inputs()
            .iter()
            .any(|&required| inputs_equal(token, required, self.options.case_sensitive))
    }

    /// Feed one token into the sequence, accepting or rejecting it
    ///
    /// A completed sequence ignores input entirely and returns false.
    pub fn receive_input(&mut self, token: char) -> bool {
        if self.is_completed() {
            return false;
        }
        self.last_processed_input = Some(token);

        let mut index = self.progress;
        if self.options.optional_whitespace && !self.matches_at(token, index) {
            match self.next_non_whitespace_index() {
                Some(next) => index = next,
                None => {
                    self.events.push(SequenceEvent::InputRejected);
                    return false;
                },
            }
        }

        if self.matches_at(token, index) {
            self.progress = index + 1;
            self.acceptable.take();
            self.events.push(SequenceEvent::TextUpdated);
            self.events.push(SequenceEvent::InputAccepted);
            if self.is_completed() {
                self.events.push(SequenceEvent::Completed);
            }
            true
        } else {
            self.events.push(SequenceEvent::InputRejected);
            false
        }
    }

    /// Take the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<SequenceEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn set_targeted(&mut self, targeted: bool) {
        self.targeted = targeted;
        self.events.push(if targeted {
            SequenceEvent::Targeted
        } else {
            SequenceEvent::Untargeted
        });
    }

    pub(crate) fn mark_removed(&mut self) {
        self.events.push(SequenceEvent::Removal);
    }

    #[cfg(test)]
    pub(crate) fn is_acceptable_cached(&self) -> bool {
        self.acceptable.get().is_some()
    }

    fn matches_at(&self, token: char, index: usize) -> bool {
        self.chars
            .get(index)
            .is_some_and(|&required| inputs_equal(required, token, self.options.case_sensitive))
    }

    /// First index at or after progress holding a non-whitespace character
    fn next_non_whitespace_index(&self) -> Option<usize> {
        (self.progress..self.chars.len()).find(|&i| !is_whitespace(self.chars[i]))
    }

    fn evaluate_acceptable_inputs(&self) -> Vec<char> {
        let mut inputs = Vec::with_capacity(4);
        let Some(&current) = self.chars.get(self.progress) else {
            return inputs;
        };
        inputs.push(current);

        if self.options.optional_whitespace {
            if let Some(next) = self.next_non_whitespace_index() {
                push_unique(&mut inputs, self.chars[next]);
            }
        }

        if !self.options.case_sensitive {
            for base in inputs.clone() {
                for variant in case_variants(base) {
                    push_unique(&mut inputs, variant);
                }
            }
        }

        inputs
    }
}

fn push_unique(inputs: &mut Vec<char>, c: char) {
    if !inputs.contains(&c) {
        inputs.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optional_ws(text: &str) -> Sequence {
        Sequence::with_options(
            text,
            SequenceOptions {
                case_sensitive: false,
                optional_whitespace: true,
            },
        )
    }

    fn feed(sequence: &mut Sequence, input: &str) -> Vec<bool> {
        input.chars().map(|c| sequence.receive_input(c)).collect()
    }

    #[test]
    fn test_new_sequence() {
        let mut sequence = Sequence::new("hello");
        assert_eq!(sequence.text(), "hello");
        assert_eq!(sequence.progress(), 0);
        assert!(!sequence.is_completed());
        assert!(!sequence.is_targeted());
        assert_eq!(sequence.last_processed_input(), None);
        assert_eq!(sequence.take_events(), vec![SequenceEvent::TextUpdated]);
    }

    #[test]
    fn test_case_insensitive_go() {
        let mut sequence = Sequence::new("Go");
        assert!(sequence.does_accept_input('g'));
        assert!(sequence.does_accept_input('G'));
        assert!(!sequence.does_accept_input('x'));

        assert!(!sequence.receive_input('x'));
        assert!(sequence.receive_input('g'));
        assert_eq!(sequence.progress(), 1);

        assert!(sequence.does_accept_input('o'));
        assert!(sequence.does_accept_input('O'));
        assert!(!sequence.does_accept_input('x'));

        assert!(sequence.receive_input('O'));
        assert!(sequence.is_completed());
        assert_eq!(sequence.completed_text(), "Go");
        assert_eq!(sequence.remaining_text(), "");
    }

    #[test]
    fn test_case_sensitive_rejects_wrong_case() {
        let mut sequence = Sequence::with_options(
            "Go",
            SequenceOptions {
                case_sensitive: true,
                optional_whitespace: false,
            },
        );
        assert_eq!(sequence.acceptable_inputs(), &['G']);
        assert!(!sequence.receive_input('g'));
        assert!(sequence.receive_input('G'));
        assert_eq!(sequence.progress(), 1);
    }

    #[test]
    fn test_accept_events_in_order() {
        let mut sequence = Sequence::new("ab");
        sequence.take_events();

        sequence.receive_input('a');
        assert_eq!(
            sequence.take_events(),
            vec![SequenceEvent::TextUpdated, SequenceEvent::InputAccepted]
        );

        sequence.receive_input('x');
        assert_eq!(sequence.take_events(), vec![SequenceEvent::InputRejected]);

        sequence.receive_input('b');
        assert_eq!(
            sequence.take_events(),
            vec![
                SequenceEvent::TextUpdated,
                SequenceEvent::InputAccepted,
                SequenceEvent::Completed
            ]
        );
    }

    #[test]
    fn test_rejection_keeps_progress() {
        let mut sequence = Sequence::new("abc");
        assert_eq!(feed(&mut sequence, "axb"), vec![true, false, true]);
        assert_eq!(sequence.progress(), 2);
        assert_eq!(sequence.last_processed_input(), Some('b'));
    }

    #[test]
    fn test_optional_whitespace_skip() {
        let mut sequence = optional_ws("go now");
        assert!(feed(&mut sequence, "gonow").iter().all(|&ok| ok));
        assert!(sequence.is_completed());
    }

    #[test]
    fn test_optional_whitespace_typed() {
        let mut sequence = optional_ws("go now");
        assert!(feed(&mut sequence, "go now").iter().all(|&ok| ok));
        assert!(sequence.is_completed());
    }

    #[test]
    fn test_optional_whitespace_never_skips_required() {
        let mut sequence = optional_ws("go now");
        feed(&mut sequence, "go");
        assert!(!sequence.receive_input('o'));
        assert_eq!(sequence.progress(), 2);
    }

    #[test]
    fn test_whitespace_required_without_option() {
        let mut sequence = Sequence::new("go now");
        feed(&mut sequence, "go");
        assert!(!sequence.receive_input('n'));
        assert!(sequence.receive_input('\t'));
        assert_eq!(sequence.progress(), 3);
    }

    #[test]
    fn test_optional_whitespace_trims_text() {
        let sequence = optional_ws("  go now \n");
        assert_eq!(sequence.text(), "go now");
        let plain = Sequence::new("  go ");
        assert_eq!(plain.text(), "  go ");
    }

    #[test]
    fn test_acceptable_inputs_with_optional_whitespace() {
        let mut sequence = optional_ws("a B");
        sequence.receive_input('a');
        assert_eq!(sequence.acceptable_inputs(), &[' ', 'B', 'b']);
    }

    #[test]
    fn test_acceptable_cache_invalidation() {
        let mut sequence = Sequence::new("abc");
        assert!(!sequence.is_acceptable_cached());
        assert_eq!(sequence.acceptable_inputs(), &['a', 'A']);
        assert!(sequence.is_acceptable_cached());

        // Rejection leaves the cache intact
        sequence.receive_input('z');
        assert!(sequence.is_acceptable_cached());

        sequence.receive_input('a');
        assert!(!sequence.is_acceptable_cached());
        assert_eq!(sequence.acceptable_inputs(), &['b', 'B']);

        sequence.set_text("xyz");
        assert!(!sequence.is_acceptable_cached());
        assert_eq!(sequence.acceptable_inputs(), &['x', 'X']);
    }

    #[test]
    fn test_empty_text_is_completed() {
        let mut sequence = Sequence::new("");
        assert!(sequence.is_completed());
        assert!(sequence.acceptable_inputs().is_empty());
        assert!(!sequence.does_accept_input('a'));
        assert!(!sequence.receive_input('a'));
    }

    #[test]
    fn test_completed_ignores_input() {
        let mut sequence = Sequence::new("a");
        sequence.receive_input('a');
        sequence.take_events();

        assert!(!sequence.receive_input('a'));
        assert_eq!(sequence.progress(), 1);
        assert_eq!(sequence.last_processed_input(), Some('a'));
        assert!(sequence.take_events().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut sequence = Sequence::new("abc");
        feed(&mut sequence, "ab");
        sequence.take_events();

        sequence.reset();
        assert_eq!(sequence.progress(), 0);
        assert_eq!(sequence.remaining_text(), "abc");
        assert_eq!(sequence.take_events(), vec![SequenceEvent::TextUpdated]);
    }

    #[test]
    fn test_set_text_resets_progress() {
        let mut sequence = Sequence::new("abc");
        feed(&mut sequence, "ab");
        sequence.set_text("xy");
        assert_eq!(sequence.progress(), 0);
        assert_eq!(sequence.len(), 2);
    }

    #[test]
    fn test_consecutive_whitespace() {
        let mut sequence = optional_ws("a  b");
        assert!(sequence.receive_input('a'));
        assert!(sequence.receive_input('b'));
        assert!(sequence.is_completed());

        let mut sequence = optional_ws("a  b");
        feed(&mut sequence, "a  ");
        assert_eq!(sequence.progress(), 3);
        assert!(!sequence.receive_input('c'));
        assert!(sequence.receive_input('b'));
    }

    #[test]
    fn test_multibyte_text() {
        let mut sequence = Sequence::new("żółw");
        assert!(sequence.receive_input('Ż'));
        assert!(sequence.receive_input('ó'));
        assert_eq!(sequence.completed_text(), "żó");
        assert_eq!(sequence.remaining_text(), "łw");
    }
}
