//! Input Module
//!
//! Turns raw, possibly repeated keyboard activity into a clean ordered list
//! of single-character tokens for each tick.
//!
//! - `token`: token equality and whitespace rules
//! - `frame`: the platform boundary and the tick-scoped `FrameSource`

mod frame;
mod token;

pub use frame::{ControlKey, FrameSource, InputBackend, RawFrame};
pub use token::{inputs_equal, is_whitespace};

pub(crate) use token::case_variants;
