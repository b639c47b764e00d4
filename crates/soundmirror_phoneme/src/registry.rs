// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phoneme frame registry.
//!
//! Maps canonical phoneme symbols to a contiguous block of the global mouth
//! sprite atlas. Frame 0 is the neutral (closed mouth) pose; every other
//! phoneme owns a 10-frame block, so the blocks partition `0..=ATLAS_LAST_FRAME`.
//!
//! The tables are built once on first use and never mutated.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::LazyLock;

/// Symbol of the neutral (silence / closed mouth) phoneme
pub const NEUTRAL_PHONEME: &str = "_";

/// Number of atlas frames owned by each non-neutral phoneme
pub const FRAMES_PER_PHONEME: u32 = 10;

/// Last frame index of the sprite atlas
pub const ATLAS_LAST_FRAME: u32 = 240;

/// Sprite frame range and metadata for one phoneme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonemeFrame {
    /// Canonical phoneme symbol (IPA-like)
    pub symbol: &'static str,
    /// Frame block code (`P000`..`P024`)
    pub frame_id: &'static str,
    /// First atlas frame of the block
    pub frame_start: u32,
    /// Last atlas frame of the block (inclusive)
    pub frame_end: u32,
    /// Human readable label
    pub label: &'static str,
    /// Example words containing the sound
    pub examples: &'static [&'static str],
    /// Optional articulation hint
    pub articulation_note: Option<&'static str>,
}

impl PhonemeFrame {
    /// Linearly interpolate a frame index inside this block.
    ///
    /// `current_time` is clamped into `[start_time, end_time]`; a zero-length
    /// span resolves to the first frame of the block.
    pub fn frame_at(&self, current_time: f64, start_time: f64, end_time: f64) -> u32 {
        let duration = end_time - start_time;
        let progress = if duration > 0.0 {
            ((current_time - start_time) / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        interpolate_frame(self.frame_start, self.frame_end, progress)
    }

    /// Number of frames in this block
    pub fn frame_count(&self) -> u32 {
        self.frame_end - self.frame_start + 1
    }
}

/// `floor(start + progress * (end - start))`, with `progress` in `[0, 1]`
pub(crate) fn interpolate_frame(frame_start: u32, frame_end: u32, progress: f64) -> u32 {
    let range = f64::from(frame_end.saturating_sub(frame_start));
    let offset = (progress * range).floor() as u32;
    (frame_start + offset).min(frame_end.max(frame_start))
}

const fn frame(
    symbol: &'static str,
    frame_id: &'static str,
    frame_start: u32,
    label: &'static str,
    examples: &'static [&'static str],
    articulation_note: Option<&'static str>,
) -> PhonemeFrame {
    PhonemeFrame {
        symbol,
        frame_id,
        frame_start,
        frame_end: frame_start + FRAMES_PER_PHONEME - 1,
        label,
        examples,
        articulation_note,
    }
}

const NEUTRAL: PhonemeFrame = PhonemeFrame {
    symbol: NEUTRAL_PHONEME,
    frame_id: "P000",
    frame_start: 0,
    frame_end: 0,
    label: "Neutral closed mouth",
    examples: &["silence", "pause"],
    articulation_note: None,
};

const FRAMES: [PhonemeFrame; 24] = [
    // Vowels
    frame("a", "P001", 1, "\"ah\" sound", &["father", "spa"], None),
    frame("i", "P002", 11, "\"ee\" sound", &["see", "machine"], None),
    frame("u", "P003", 21, "\"oo\" sound", &["food", "blue"], None),
    frame("ɛ", "P004", 31, "\"eh\" sound", &["bed", "met"], None),
    frame("o", "P005", 41, "\"oh\" sound (pure vowel, no glide)", &["go"], Some("Held, no glide")),
    frame(
        "y",
        "P006",
        51,
        "Rounded \"ee\"",
        &["French \"tu\"", "German \"über\""],
        Some("Rounded lips"),
    ),
    // Plosives
    frame("p", "P007", 61, "\"p\" sound", &["pat"], Some("Lip closure")),
    frame("t", "P008", 71, "\"t\" sound", &["top"], Some("Tongue to ridge")),
    frame("d", "P009", 81, "\"d\" sound (same mouth as /t/)", &["dog"], None),
    frame("k", "P010", 91, "\"k\" sound", &["cat"], Some("Back of tongue")),
    frame("g", "P011", 101, "\"g\" sound (same mouth as /k/)", &["go"], None),
    frame("ʔ", "P012", 111, "Glottal stop", &["uh-oh"], Some("Throat closure")),
    // Nasals
    frame("n", "P013", 121, "\"n\" sound (same tongue as /t/)", &["no"], None),
    frame("ŋ", "P014", 131, "\"ng\" sound", &["sing"], Some("Back nasal")),
    // Fricatives
    frame("s", "P015", 141, "\"s\" sound", &["see"], None),
    frame("ʃ", "P016", 151, "\"sh\" sound", &["ship"], None),
    frame("θ", "P017", 161, "\"th\" (voiceless)", &["think"], None),
    frame("f", "P018", 171, "\"f\" sound", &["fan"], Some("Lip-to-teeth")),
    frame("h", "P019", 181, "\"h\" sound", &["hat"], Some("Open breath")),
    // Affricates
    frame("tʃ", "P020", 191, "\"ch\" sound", &["chair"], None),
    // Liquids
    frame("r", "P021", 201, "\"r\" sound (general rhotic)", &["red"], None),
    frame("l", "P022", 211, "\"l\" sound", &["lip"], None),
    frame(
        "ɬ",
        "P023",
        221,
        "Welsh \"ll\" (voiceless lateral)",
        &["Welsh \"ll\""],
        Some("Air around tongue"),
    ),
    // Clicks
    frame("ǃ", "P024", 231, "Dental click", &["tsk"], Some("Dental")),
];

/// Common spellings accepted in place of canonical symbols
const ALIASES: [(&str, &str); 9] = [
    ("ah", "a"),
    ("ee", "i"),
    ("oo", "u"),
    ("eh", "ɛ"),
    ("oh", "o"),
    ("sh", "ʃ"),
    ("th", "θ"),
    ("ch", "tʃ"),
    ("ng", "ŋ"),
];

static REGISTRY: LazyLock<IndexMap<&'static str, PhonemeFrame>> = LazyLock::new(|| {
    let mut map = IndexMap::with_capacity(FRAMES.len() + 1);
    map.insert(NEUTRAL.symbol, NEUTRAL);
    for block in FRAMES {
        map.insert(block.symbol, block);
    }
    map
});

static ALIAS_TABLE: LazyLock<IndexMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.into_iter().collect());

/// Resolve an alias spelling to its canonical symbol.
///
/// Matching is case-insensitive. Returns `None` if `spelling` is not an alias.
pub fn alias_for(spelling: &str) -> Option<&'static str> {
    ALIAS_TABLE.get(spelling.to_lowercase().as_str()).copied()
}

/// Look up the frame data for a phoneme symbol or alias.
///
/// Returns `None` for unknown symbols; callers fall back to [`neutral_frame`].
pub fn phoneme_frame(symbol: &str) -> Option<&'static PhonemeFrame> {
    let canonical = alias_for(symbol).unwrap_or(symbol);
    REGISTRY.get(canonical)
}

/// Frame data for `symbol`, or the neutral frame when it is unknown
pub fn phoneme_frame_or_neutral(symbol: &str) -> &'static PhonemeFrame {
    phoneme_frame(symbol).unwrap_or_else(neutral_frame)
}

/// The always-available neutral frame (frame 0, closed mouth)
pub fn neutral_frame() -> &'static PhonemeFrame {
    &REGISTRY[NEUTRAL_PHONEME]
}

/// All supported phoneme symbols except neutral, in registry order
pub fn supported_phonemes() -> Vec<&'static str> {
    REGISTRY
        .keys()
        .copied()
        .filter(|symbol| *symbol != NEUTRAL_PHONEME)
        .collect()
}

/// Iterate over every registered frame block, neutral first
pub fn all_frames() -> impl Iterator<Item = &'static PhonemeFrame> {
    REGISTRY.values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_partition_atlas() {
        let mut frames: Vec<_> = all_frames().collect();
        frames.sort_by_key(|f| f.frame_start);

        let mut next = 0;
        for frame in frames {
            assert_eq!(frame.frame_start, next, "gap or overlap before {}", frame.symbol);
            assert!(frame.frame_end >= frame.frame_start);
            next = frame.frame_end + 1;
        }
        assert_eq!(next, ATLAS_LAST_FRAME + 1);
    }

    #[test]
    fn test_alias_resolution_is_case_insensitive() {
        assert_eq!(phoneme_frame("SH").map(|f| f.symbol), Some("ʃ"));
        assert_eq!(phoneme_frame("ch").map(|f| f.symbol), Some("tʃ"));
        assert_eq!(phoneme_frame("k").map(|f| f.frame_start), Some(91));
        assert_eq!(alias_for("Ng"), Some("ŋ"));
        assert_eq!(alias_for("zz"), None);
    }

    #[test]
    fn test_unknown_symbol_is_not_found() {
        assert!(phoneme_frame("ʒ").is_none());
        assert!(phoneme_frame("").is_none());
        assert_eq!(phoneme_frame_or_neutral("ʒ").symbol, NEUTRAL_PHONEME);
    }

    #[test]
    fn test_neutral_frame() {
        let neutral = neutral_frame();
        assert_eq!(neutral.symbol, "_");
        assert_eq!(neutral.frame_start, 0);
        assert_eq!(neutral.frame_end, 0);
        assert_eq!(neutral.frame_count(), 1);
    }

    #[test]
    fn test_supported_phonemes() {
        let supported = supported_phonemes();
        assert_eq!(supported.len(), 24);
        assert_eq!(supported.first(), Some(&"a"));
        assert!(!supported.contains(&NEUTRAL_PHONEME));
    }

    #[test]
    fn test_frame_at_interpolates_linearly() {
        let a = phoneme_frame("a").unwrap();
        assert_eq!(a.frame_at(0.0, 0.0, 100.0), 1);
        assert_eq!(a.frame_at(50.0, 0.0, 100.0), 5);
        assert_eq!(a.frame_at(100.0, 0.0, 100.0), 10);
        assert_eq!(a.frame_at(500.0, 0.0, 100.0), 10);
        assert_eq!(a.frame_at(-20.0, 0.0, 100.0), 1);
        assert_eq!(a.frame_at(5.0, 5.0, 5.0), 1);
    }
}
