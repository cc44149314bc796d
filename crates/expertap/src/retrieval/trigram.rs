//! Trigram similarity in the style of PostgreSQL `pg_trgm`
//!
//! Text is lowercased and split into alphanumeric words; each word is padded with
//! two leading spaces and one trailing space before its trigrams are taken.

use std::collections::HashSet;

/// Set of distinct trigrams of a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrigramSet(HashSet<[char; 3]>);

impl TrigramSet {
    pub fn new(text: &str) -> Self {
        let mut set = HashSet::new();
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let padded: Vec<char> = "  "
                .chars()
                .chain(word.chars().flat_map(char::to_lowercase))
                .chain(std::iter::once(' '))
                .collect();
            for window in padded.windows(3) {
                set.insert([window[0], window[1], window[2]]);
            }
        }
        Self(set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fraction of `self`'s trigrams that also occur in `other` (0.0 when `self` is empty)
    pub fn coverage_in(&self, other: &TrigramSet) -> f32 {
        if self.0.is_empty() {
            return 0.0;
        }
        let shared = self.0.iter().filter(|t| other.0.contains(*t)).count();
        shared as f32 / self.0.len() as f32
    }
}

/// How much of `query` is present in `text`, 0.0-1.0
pub fn query_coverage(query: &str, text: &str) -> f32 {
    TrigramSet::new(query).coverage_in(&TrigramSet::new(text))
}
