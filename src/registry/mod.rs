//! Registry Module
//!
//! Owns the live sequences of a matching session, tracks which of them are
//! targeted, and routes each tick's tokens to them exactly once.

mod dispatcher;
mod events;

pub use dispatcher::SequenceRegistry;
pub use events::{Event, SequenceId};
