//! Typing statistics
//!
//! Consumers of registry-level events. They contain no matching logic and
//! only count what the registry reports.
//!
//! - `InputStatistics`: accepted/rejected counts, overall and per character
//! - `KeystrokeRate`: keys and words per minute over a sliding window

mod accuracy;
mod rate;

pub use accuracy::{CharStatistics, InputStatistics};
pub use rate::KeystrokeRate;
