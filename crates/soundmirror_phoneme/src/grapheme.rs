// SPDX-License-Identifier: MIT OR Apache-2.0
//! Grapheme segmentation.
//!
//! A small arena trie keyed by `char` performs longest-match lookup of
//! grapheme patterns, and [`text_to_phonemes`] walks text left to right
//! turning it into phoneme symbols.

use crate::registry::NEUTRAL_PHONEME;
use crate::rules::rules_for;
use std::collections::HashMap;

/// Characters that close a word and collapse into a single neutral entry
const SEPARATORS: &str = ".,!?;:'\"()-";

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<char, usize>,
    phoneme: Option<&'static str>,
}

/// Longest-match grapheme trie.
///
/// Patterns are stored lower-cased. `max_pattern_len` bounds the lookahead of
/// every match.
#[derive(Debug, Clone)]
pub struct GraphemeTrie {
    nodes: Vec<TrieNode>,
    max_pattern_len: usize,
}

impl GraphemeTrie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            max_pattern_len: 0,
        }
    }

    /// Insert a grapheme pattern. Re-inserting a pattern replaces its phoneme.
    pub fn insert(&mut self, pattern: &str, phoneme: &'static str) {
        let mut node_idx = 0;
        let mut len = 0;
        for c in pattern.chars().flat_map(char::to_lowercase) {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&c) {
                id
            } else {
                let id = self.nodes.len();
                self.nodes.push(TrieNode::default());
                self.nodes[node_idx].children.insert(c, id);
                id
            };
            node_idx = next_idx;
            len += 1;
        }
        if len == 0 {
            return;
        }
        self.nodes[node_idx].phoneme = Some(phoneme);
        self.max_pattern_len = self.max_pattern_len.max(len);
    }

    /// Longest pattern that prefixes `input`.
    ///
    /// Returns the number of chars consumed and the mapped phoneme.
    pub fn longest_match(&self, input: &[char]) -> Option<(usize, &'static str)> {
        let mut node_idx = 0;
        let mut best = None;
        for (consumed, c) in input.iter().take(self.max_pattern_len).enumerate() {
            match self.nodes[node_idx].children.get(c) {
                Some(&next) => node_idx = next,
                None => break,
            }
            if let Some(phoneme) = self.nodes[node_idx].phoneme {
                best = Some((consumed + 1, phoneme));
            }
        }
        best
    }

    /// Exact lookup of a single pattern
    pub fn get(&self, pattern: &str) -> Option<&'static str> {
        let chars: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();
        match self.longest_match(&chars) {
            Some((len, phoneme)) if len == chars.len() => Some(phoneme),
            _ => None,
        }
    }

    /// Length in chars of the longest stored pattern
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }
}

impl Default for GraphemeTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `c` separates words (whitespace or punctuation)
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(c)
}

/// Convert text into a phoneme sequence using the rules of `language_code`.
///
/// Single left-to-right pass over the lower-cased text:
/// - a run of separators yields at most one neutral `_` entry, checked before
///   any grapheme rule;
/// - otherwise the longest grapheme pattern wins (digraphs before single
///   characters);
/// - an unmapped character yields the language's default phoneme.
///
/// Unknown language codes use the English rules. Never fails; non-empty input
/// always produces a non-empty sequence.
pub fn text_to_phonemes(text: &str, language_code: &str) -> Vec<&'static str> {
    let rules = rules_for(language_code);
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut phonemes = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if is_separator(c) {
            if phonemes.last() != Some(&NEUTRAL_PHONEME) {
                phonemes.push(NEUTRAL_PHONEME);
            }
            i += 1;
            continue;
        }

        match rules.trie().longest_match(&chars[i..]) {
            Some((consumed, phoneme)) => {
                phonemes.push(phoneme);
                i += consumed;
            }
            None => {
                phonemes.push(rules.default_phoneme);
                i += 1;
            }
        }
    }

    phonemes
}
