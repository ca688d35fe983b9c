//! Prefix trie backing word and signature autocomplete
//!
//! Every inserted word is counted, so a word indexed by several files survives until the
//! last of them is removed.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    count: usize,
}

impl TrieNode {
    fn is_empty(&self) -> bool {
        self.count == 0 && self.children.is_empty()
    }

    fn collect(&self, prefix: &mut String, out: &mut Vec<String>) {
        if self.count > 0 {
            out.push(prefix.clone());
        }
        for (ch, child) in &self.children {
            prefix.push(*ch);
            child.collect(prefix, out);
            prefix.pop();
        }
    }

    /// Returns true when the word was present
    fn remove(&mut self, mut chars: std::str::Chars<'_>) -> bool {
        match chars.next() {
            None if self.count > 0 => {
                self.count -= 1;
                true
            }
            None => false,
            Some(ch) => {
                let Some(child) = self.children.get_mut(&ch) else {
                    return false;
                };
                let removed = child.remove(chars);
                if child.is_empty() {
                    self.children.remove(&ch);
                }
                removed
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrefixTrie {
    root: TrieNode,
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.count += 1;
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.root.remove(word.chars())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).map(|node| node.count > 0).unwrap_or(false)
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    /// Every completion of `prefix`, as the text that follows it, in sorted order. The
    /// prefix itself shows up as an empty suffix when it is a word.
    pub fn find_suffixes(&self, prefix: &str) -> Vec<String> {
        let mut suffixes = Vec::new();
        if let Some(node) = self.find(prefix) {
            node.collect(&mut String::new(), &mut suffixes);
        }
        suffixes
    }
}
