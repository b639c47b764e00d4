// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-language grapheme to phoneme rule tables.
//!
//! Tables are process-wide constants built once on first use. Unknown
//! language codes resolve to the English rules.

use crate::grapheme::GraphemeTrie;
use crate::registry::NEUTRAL_PHONEME;
use indexmap::IndexMap;
use std::sync::LazyLock;

/// Code of the language used when a requested code is unknown
pub const FALLBACK_LANGUAGE: &str = "en";

/// Grapheme rules for one language
#[derive(Debug, Clone)]
pub struct LanguageRules {
    /// Language code (`en`, `es`, ...)
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Phoneme emitted for characters with no rule
    pub default_phoneme: &'static str,
    graphemes: IndexMap<&'static str, &'static str>,
    trie: GraphemeTrie,
}

impl LanguageRules {
    fn new(
        code: &'static str,
        name: &'static str,
        table: &[(&'static str, &'static str)],
        default_phoneme: &'static str,
    ) -> Self {
        let mut trie = GraphemeTrie::new();
        for &(pattern, phoneme) in table {
            trie.insert(pattern, phoneme);
        }
        Self {
            code,
            name,
            default_phoneme,
            graphemes: table.iter().copied().collect(),
            trie,
        }
    }

    /// Phoneme for an exact grapheme pattern
    pub fn phoneme_for(&self, grapheme: &str) -> Option<&'static str> {
        self.graphemes.get(grapheme).copied()
    }

    /// All `(grapheme, phoneme)` rules in table order
    pub fn graphemes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.graphemes.iter().map(|(g, p)| (*g, *p))
    }

    /// Longest-match lookup structure over the rules
    pub fn trie(&self) -> &GraphemeTrie {
        &self.trie
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("a", "a"),
    ("e", "ɛ"),
    ("i", "i"),
    ("o", "o"),
    ("u", "u"),
    ("b", "p"), // same lip position as p
    ("c", "k"),
    ("d", "d"),
    ("f", "f"),
    ("g", "g"),
    ("h", "h"),
    ("j", "tʃ"),
    ("k", "k"),
    ("l", "l"),
    ("m", "p"), // lip closure
    ("n", "n"),
    ("p", "p"),
    ("q", "k"),
    ("r", "r"),
    ("s", "s"),
    ("t", "t"),
    ("v", "f"),
    ("w", "u"),
    ("x", "k"),
    ("y", "i"),
    ("z", "s"),
    ("sh", "ʃ"),
    ("ch", "tʃ"),
    ("th", "θ"),
    ("ng", "ŋ"),
    ("ee", "i"),
    ("oo", "u"),
    ("ea", "i"),
    ("ai", "a"),
    ("ou", "u"),
];

const SPANISH: &[(&str, &str)] = &[
    ("a", "a"),
    ("e", "ɛ"),
    ("i", "i"),
    ("o", "o"),
    ("u", "u"),
    ("b", "p"),
    ("c", "k"),
    ("d", "d"),
    ("f", "f"),
    ("g", "g"),
    ("h", NEUTRAL_PHONEME), // silent
    ("j", "h"),
    ("k", "k"),
    ("l", "l"),
    ("m", "p"),
    ("n", "n"),
    ("ñ", "n"),
    ("p", "p"),
    ("q", "k"),
    ("r", "r"),
    ("s", "s"),
    ("t", "t"),
    ("v", "p"),
    ("w", "u"),
    ("x", "k"),
    ("y", "i"),
    ("z", "s"),
    ("ll", "i"),
    ("rr", "r"),
    ("ch", "tʃ"),
    ("qu", "k"),
];

// Latin transliteration
const ARABIC: &[(&str, &str)] = &[
    ("a", "a"),
    ("i", "i"),
    ("u", "u"),
    ("b", "p"),
    ("t", "t"),
    ("th", "θ"),
    ("j", "tʃ"),
    ("h", "h"),
    ("kh", "k"),
    ("d", "d"),
    ("dh", "θ"),
    ("r", "r"),
    ("z", "s"),
    ("s", "s"),
    ("sh", "ʃ"),
    ("f", "f"),
    ("q", "k"),
    ("k", "k"),
    ("l", "l"),
    ("m", "p"),
    ("n", "n"),
    ("w", "u"),
    ("y", "i"),
    ("'", "ʔ"),
];

static LANGUAGES: LazyLock<IndexMap<&'static str, LanguageRules>> = LazyLock::new(|| {
    [
        LanguageRules::new("en", "English", ENGLISH, NEUTRAL_PHONEME),
        LanguageRules::new("es", "Spanish", SPANISH, NEUTRAL_PHONEME),
        LanguageRules::new("ar", "Arabic", ARABIC, NEUTRAL_PHONEME),
    ]
    .into_iter()
    .map(|rules| (rules.code, rules))
    .collect()
});

/// Look up the rules for an exact language code
pub fn language_rules(code: &str) -> Option<&'static LanguageRules> {
    LANGUAGES.get(code.to_ascii_lowercase().as_str())
}

/// Rules for `code`, falling back to English when the code is unknown
pub fn rules_for(code: &str) -> &'static LanguageRules {
    language_rules(code).unwrap_or_else(|| {
        tracing::debug!("Unknown language code {code:?}, using {FALLBACK_LANGUAGE} rules");
        &LANGUAGES[FALLBACK_LANGUAGE]
    })
}

/// `(code, name)` of every supported language
pub fn supported_languages() -> Vec<(&'static str, &'static str)> {
    LANGUAGES.values().map(|r| (r.code, r.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::phoneme_frame;

    #[test]
    fn test_supported_languages() {
        assert_eq!(
            supported_languages(),
            vec![("en", "English"), ("es", "Spanish"), ("ar", "Arabic")]
        );
    }

    #[test]
    fn test_rules_lookup() {
        assert_eq!(language_rules("ES").map(|r| r.name), Some("Spanish"));
        assert!(language_rules("fr").is_none());
        assert_eq!(rules_for("fr").code, "en");
    }

    #[test]
    fn test_patterns_are_at_most_two_chars() {
        for (code, _) in supported_languages() {
            assert!(rules_for(code).trie().max_pattern_len() <= 2);
        }
    }

    #[test]
    fn test_every_rule_targets_a_registered_phoneme() {
        for (code, _) in supported_languages() {
            let rules = rules_for(code);
            for (grapheme, phoneme) in rules.graphemes() {
                assert!(
                    phoneme_frame(phoneme).is_some(),
                    "{code}: {grapheme} -> {phoneme} is not registered"
                );
            }
            assert!(phoneme_frame(rules.default_phoneme).is_some());
        }
    }

    #[test]
    fn test_phoneme_for() {
        assert_eq!(rules_for("ar").phoneme_for("'"), Some("ʔ"));
        assert_eq!(rules_for("en").phoneme_for("'"), None);
        assert_eq!(rules_for("es").phoneme_for("ñ"), Some("n"));
        assert_eq!(rules_for("en").phoneme_for("sh"), Some("ʃ"));
    }
}
