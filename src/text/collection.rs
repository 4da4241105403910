//! Candidate texts indexed by initial
//!
//! Picking a text whose first character differs from every live sequence's
//! remaining text keeps target acquisition unambiguous. That policy lives
//! here, outside the matcher, which always breaks ties by registration
//! order.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::TextSource;
use crate::registry::SequenceRegistry;

/// A deduplicated set of texts
#[derive(Debug, Clone, Default)]
pub struct TextCollection {
    texts: Vec<String>,
    /// Exact initial -> indices into `texts`
    by_initial: BTreeMap<char, Vec<usize>>,
    /// Upper-cased initial -> indices into `texts`
    by_upper_initial: BTreeMap<char, Vec<usize>>,
}

impl TextCollection {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collection = Self::default();
        for text in texts {
            collection.insert(text.into());
        }
        collection
    }

    /// Add a text; empty and duplicate texts are ignored
    pub fn insert(&mut self, text: String) {
        let Some(initial) = text.chars().next() else {
            return;
        };
        if self.texts.contains(&text) {
            return;
        }
        let index = self.texts.len();
        self.texts.push(text);
        self.by_initial.entry(initial).or_default().push(index);
        self.by_upper_initial
            .entry(upper(initial))
            .or_default()
            .push(index);
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Distinct initials; upper-cased unless `case_sensitive`
    pub fn initials(&self, case_sensitive: bool) -> impl Iterator<Item = char> + '_ {
        self.index(case_sensitive).keys().copied()
    }

    /// Texts starting with `initial`
    pub fn texts_by_initial(&self, initial: char, case_sensitive: bool) -> Vec<&str> {
        let key = if case_sensitive { initial } else { upper(initial) };
        self.index(case_sensitive)
            .get(&key)
            .map(|indices| indices.iter().map(|&i| self.texts[i].as_str()).collect())
            .unwrap_or_default()
    }

    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        self.texts.choose(rng).map(String::as_str)
    }

    /// A random text whose initial is not the initial of any of `others`
    ///
    /// Initials are weighted by how many texts they start.
    pub fn unique_initial_text<'a, R, I>(
        &self,
        others: I,
        case_sensitive: bool,
        rng: &mut R,
    ) -> Option<&str>
    where
        R: Rng,
        I: IntoIterator<Item = &'a str>,
    {
        let taken: Vec<char> = others
            .into_iter()
            .filter_map(|text| text.chars().next())
            .map(|c| if case_sensitive { c } else { upper(c) })
            .collect();

        let available: Vec<&Vec<usize>> = self
            .index(case_sensitive)
            .iter()
            .filter(|(initial, _)| !taken.contains(*initial))
            .map(|(_, indices)| indices)
            .collect();

        let total: usize = available.iter().map(|indices| indices.len()).sum();
        if total == 0 {
            return None;
        }

        let mut pick = rng.gen_range(0..total);
        for indices in available {
            if pick < indices.len() {
                let index = *indices.choose(rng)?;
                return Some(&self.texts[index]);
            }
            pick -= indices.len();
        }
        None
    }

    /// A text that can be targeted without ambiguity among the registry's
    /// live sequences, or any random text if none exists
    pub fn find_uniquely_targetable_text<R: Rng>(
        &self,
        registry: &SequenceRegistry,
        rng: &mut R,
    ) -> Option<&str> {
        let case_sensitive = registry.sequences().any(|(_, s)| s.is_case_sensitive());
        let remaining: Vec<String> = registry
            .sequences()
            .map(|(_, s)| s.remaining_text())
            .collect();

        match self.unique_initial_text(remaining.iter().map(String::as_str), case_sensitive, rng) {
            Some(text) => Some(text),
            None => {
                tracing::warn!(
                    live = registry.len(),
                    "no text with a unique initial, picking at random"
                );
                self.pick_random(rng)
            },
        }
    }

    fn index(&self, case_sensitive: bool) -> &BTreeMap<char, Vec<usize>> {
        if case_sensitive {
            &self.by_initial
        } else {
            &self.by_upper_initial
        }
    }
}

/// Text source drawing uniquely targetable texts from a collection
#[derive(Debug, Clone)]
pub struct CollectionSource<R> {
    collection: TextCollection,
    rng: R,
}

impl<R: Rng> CollectionSource<R> {
    pub fn new(collection: TextCollection, rng: R) -> Self {
        Self { collection, rng }
    }

    pub fn collection(&self) -> &TextCollection {
        &self.collection
    }
}

impl<R: Rng> TextSource for CollectionSource<R> {
    fn next_text(&mut self, registry: &SequenceRegistry) -> Option<String> {
        self.collection
            .find_uniquely_targetable_text(registry, &mut self.rng)
            .map(str::to_string)
    }
}

/// Single-character uppercase mapping, or the character itself
fn upper(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
