//! Word search over the corpus

use crate::paths::natural_cmp;
use std::collections::{BTreeMap, BTreeSet};

/// Lowercased alphanumeric runs of `text`
pub fn words_of(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// word -> paths containing it
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    paths_by_word: BTreeMap<String, BTreeSet<String>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, words: &BTreeSet<String>) {
        for word in words {
            self.paths_by_word
                .entry(word.clone())
                .or_default()
                .insert(path.to_string());
        }
    }

    pub fn remove(&mut self, path: &str) {
        self.paths_by_word.retain(|_, paths| {
            paths.remove(path);
            !paths.is_empty()
        });
    }

    /// Paths containing every word of `query`, in natural path order
    pub fn search(&self, query: &str) -> Vec<String> {
        let mut words = words_of(query).into_iter();
        let Some(first) = words.next() else {
            return Vec::new();
        };
        let mut found = self.paths_by_word.get(&first).cloned().unwrap_or_default();
        for word in words {
            match self.paths_by_word.get(&word) {
                Some(paths) => found.retain(|path| paths.contains(path)),
                None => found.clear(),
            }
        }
        let mut found: Vec<String> = found.into_iter().collect();
        found.sort_by(|a, b| natural_cmp(a, b));
        found
    }
}
