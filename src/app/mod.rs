//! Application glue module
//!
//! Configuration and other session-level settings.

mod config;

pub use config::{ConfigError, InputConfig, MatchingConfig};
