//! Splitting a corpus into candidate texts

use serde::{Deserialize, Serialize};

/// Where one text ends and the next begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// One text per line
    #[default]
    Newline,
    /// One text per whitespace-separated word
    AnyWhitespace,
}

/// Corpus splitting rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextExtractor {
    pub separator: Separator,
    /// Trim leading and trailing whitespace from each text
    pub trim_whitespace: bool,
    /// Characters removed from every text
    pub character_filter: String,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            separator: Separator::Newline,
            trim_whitespace: true,
            character_filter: ".,`\"'".to_string(),
        }
    }
}

impl TextExtractor {
    /// Extract the non-empty texts of a corpus, in corpus order
    pub fn extract(&self, corpus: &str) -> Vec<String> {
        let pieces: Box<dyn Iterator<Item = &str> + '_> = match self.separator {
            Separator::Newline => Box::new(corpus.split('\n')),
            Separator::AnyWhitespace => Box::new(corpus.split(char::is_whitespace)),
        };

        pieces
            .map(|piece| self.filter(piece))
            .map(|text| {
                if self.trim_whitespace {
                    text.trim().to_string()
                } else {
                    text
                }
            })
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn filter(&self, piece: &str) -> String {
        piece
            .chars()
            .filter(|c| !self.character_filter.contains(*c))
            .collect()
    }
}
