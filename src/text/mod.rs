//! Text sources
//!
//! The boundary through which target strings reach the matcher. The matcher
//! never selects or ranks texts itself; a host asks a `TextSource` for the
//! next text and spawns a sequence with it.

mod collection;
mod extract;

pub use collection::{CollectionSource, TextCollection};
pub use extract::{Separator, TextExtractor};

use crate::registry::SequenceRegistry;

/// Supplies target strings on demand
pub trait TextSource {
    /// The next text to assign, given the currently live sequences
    fn next_text(&mut self, registry: &SequenceRegistry) -> Option<String>;
}
