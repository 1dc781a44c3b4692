use std::collections::{hash_map::Entry, HashMap};

use crate::error::{HuffmanError, Result};

/// Occurrence count of every distinct symbol in a text.
///
/// Entries are kept in the order their symbol first appears, which is the
/// order the tree builder falls back on when two weights are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn count(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(HuffmanError::InvalidInput("cannot count symbols of an empty text"));
        }

        let mut entries: Vec<(char, u64)> = Vec::new();
        let mut index: HashMap<char, usize> = HashMap::new();
        for symbol in text.chars() {
            match index.entry(symbol) {
                Entry::Occupied(o) => entries[*o.get()].1 += 1,
                Entry::Vacant(v) => {
                    v.insert(entries.len());
                    entries.push((symbol, 1));
                }
            }
        }

        Ok(Self { entries, index })
    }

    /// Builds a table from explicit counts, keeping the given order.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, u64)>,
    {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for (symbol, count) in counts {
            if count == 0 {
                return Err(HuffmanError::InvalidInput("symbol counts must be positive"));
            }
            if index.insert(symbol, entries.len()).is_some() {
                return Err(HuffmanError::InvalidInput("symbol listed more than once"));
            }
            entries.push((symbol, count));
        }

        if entries.is_empty() {
            return Err(HuffmanError::InvalidInput("frequency table has no symbols"));
        }

        Ok(Self { entries, index })
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.index.get(&symbol).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of symbols in the counted text.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Iterates `(symbol, count)` in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }
}
