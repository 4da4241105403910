//! Typematch
//!
//! A real-time typed-input matching engine for typing games. Given a set of
//! target texts and a stream of keystrokes, it decides which text is being
//! typed, advances it character by character, and reports acceptance,
//! rejection, targeting and completion as events.
//!
//! - `input`: per-tick token derivation from raw keyboard input
//! - `sequence`: the per-text matching automaton
//! - `registry`: target acquisition and token dispatch across sequences
//! - `context`: one matching session tying input and registry together
//! - `app`: configuration
//! - `stats`: accuracy and typing-speed event consumers
//! - `text`: text-source boundary for choosing target texts
//! - `replay`: deterministic scripted replay
//!
//! ```
//! use typematch::context::MatchingContext;
//! use typematch::input::RawFrame;
//!
//! let mut context = MatchingContext::default();
//! let id = context.spawn("go");
//! context.process_input(&RawFrame::typed(1, "g"));
//! assert_eq!(context.sequence(id).map(|s| s.progress()), Some(1));
//! ```

pub mod app;
pub mod context;
pub mod input;
pub mod registry;
pub mod replay;
pub mod sequence;
pub mod stats;
pub mod text;

pub use app::MatchingConfig;
pub use context::MatchingContext;
pub use registry::{Event, SequenceId, SequenceRegistry};
pub use sequence::{Sequence, SequenceEvent, SequenceOptions};
