// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-stamped phoneme timelines.

use crate::grapheme::text_to_phonemes;
use crate::registry::{phoneme_frame_or_neutral, PhonemeFrame};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default duration of one phoneme slot, in milliseconds
pub const DEFAULT_PHONEME_DURATION_MS: f64 = 100.0;

/// Unique identifier for a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineId(pub Uuid);

impl TimelineId {
    /// Create a new random timeline ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimelineId {
    fn default() -> Self {
        Self::new()
    }
}

/// One phoneme slot of a timeline.
///
/// The frame range is copied from the registry when the entry is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonemeTimelineEntry {
    /// Phoneme symbol
    pub phoneme: String,
    /// Start time in milliseconds
    pub start_time: f64,
    /// End time in milliseconds (exclusive)
    pub end_time: f64,
    /// First sprite frame of the phoneme's block
    pub frame_start: u32,
    /// Last sprite frame of the phoneme's block
    pub frame_end: u32,
}

impl PhonemeTimelineEntry {
    /// Entry for `phoneme` over `[start_time, end_time)`.
    ///
    /// Unknown phonemes take the neutral frame range.
    pub fn new(phoneme: &str, start_time: f64, end_time: f64) -> Self {
        Self::with_frame(phoneme, phoneme_frame_or_neutral(phoneme), start_time, end_time)
    }

    pub(crate) fn with_frame(
        phoneme: &str,
        frame: &PhonemeFrame,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            phoneme: phoneme.to_string(),
            start_time,
            end_time,
            frame_start: frame.frame_start,
            frame_end: frame.frame_end,
        }
    }

    /// Length of the slot in milliseconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `time` falls inside `[start_time, end_time)`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }
}

/// Errors raised when a timeline enters the system from outside
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// JSON decoding or encoding failed
    #[error("Invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// RON decoding failed
    #[error("Invalid timeline RON: {0}")]
    RonDecode(#[from] ron::error::SpannedError),

    /// RON encoding failed
    #[error("Failed to encode timeline RON: {0}")]
    RonEncode(#[from] ron::Error),

    /// Entry times are not finite or run backwards
    #[error("Entry {index} has invalid times [{start}, {end})")]
    InvalidEntry {
        /// Index of the offending entry
        index: usize,
        /// Its start time
        start: f64,
        /// Its end time
        end: f64,
    },

    /// Entries overlap or leave a gap
    #[error("Entry {index} starts at {start} but the previous entry ends at {previous_end}")]
    NotContiguous {
        /// Index of the offending entry
        index: usize,
        /// Its start time
        start: f64,
        /// End time of the entry before it
        previous_end: f64,
    },

    /// Declared total duration disagrees with the last entry
    #[error("Total duration {declared} does not match last entry end {actual}")]
    DurationMismatch {
        /// Declared total duration
        declared: f64,
        /// End time of the last entry
        actual: f64,
    },
}

/// An ordered sequence of phoneme entries for one utterance.
///
/// Immutable once built; re-anchoring produces a new timeline with a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhonemeTimeline {
    id: TimelineId,
    text: String,
    language: String,
    phonemes: Vec<PhonemeTimelineEntry>,
    total_duration: f64,
}

impl PhonemeTimeline {
    /// Assemble a timeline from entries.
    ///
    /// The total duration is the last entry's end time, or 0 when empty.
    pub fn from_entries(
        text: impl Into<String>,
        language: impl Into<String>,
        phonemes: Vec<PhonemeTimelineEntry>,
    ) -> Self {
        let total_duration = phonemes.last().map(|e| e.end_time).unwrap_or(0.0);
        Self {
            id: TimelineId::new(),
            text: text.into(),
            language: language.into(),
            phonemes,
            total_duration,
        }
    }

    /// Unique id of this timeline
    pub fn id(&self) -> TimelineId {
        self.id
    }

    /// Source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Language code used to build the timeline
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Entries in time order
    pub fn entries(&self) -> &[PhonemeTimelineEntry] {
        &self.phonemes
    }

    /// End time of the last entry, in milliseconds
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    /// Whether the timeline has no entries
    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    /// Phoneme symbols in order
    pub fn phoneme_symbols(&self) -> impl Iterator<Item = &str> {
        self.phonemes.iter().map(|e| e.phoneme.as_str())
    }

    /// Check that entries are time-contiguous and that the total duration
    /// matches the last entry.
    pub fn validate(&self) -> Result<(), TimelineError> {
        let mut previous_end: Option<f64> = None;
        for (index, entry) in self.phonemes.iter().enumerate() {
            let (start, end) = (entry.start_time, entry.end_time);
            if !start.is_finite() || !end.is_finite() || end < start {
                return Err(TimelineError::InvalidEntry { index, start, end });
            }
            if let Some(previous_end) = previous_end {
                if start != previous_end {
                    return Err(TimelineError::NotContiguous { index, start, previous_end });
                }
            }
            previous_end = Some(end);
        }

        let actual = previous_end.unwrap_or(0.0);
        if self.total_duration != actual {
            return Err(TimelineError::DurationMismatch {
                declared: self.total_duration,
                actual,
            });
        }
        Ok(())
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, TimelineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let timeline: Self = serde_json::from_str(json)?;
        timeline.validate()?;
        Ok(timeline)
    }

    /// Encode as pretty RON
    pub fn to_ron(&self) -> Result<String, TimelineError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Decode from RON and validate
    pub fn from_ron(source: &str) -> Result<Self, TimelineError> {
        let timeline: Self = ron::from_str(source)?;
        timeline.validate()?;
        Ok(timeline)
    }
}

/// Build a timeline with a fixed slot per phoneme.
///
/// Slots run back to back from t=0, so `entry[i].end_time ==
/// entry[i + 1].start_time` and the total duration is the last end time.
/// A negative or non-finite `phoneme_duration` is treated as 0.
pub fn build_timeline(text: &str, language_code: &str, phoneme_duration: f64) -> PhonemeTimeline {
    let duration = if phoneme_duration.is_finite() {
        phoneme_duration.max(0.0)
    } else {
        0.0
    };

    let mut current_time = 0.0;
    let entries = text_to_phonemes(text, language_code)
        .into_iter()
        .map(|phoneme| {
            let start = current_time;
            current_time = start + duration;
            PhonemeTimelineEntry::new(phoneme, start, current_time)
        })
        .collect();

    PhonemeTimeline::from_entries(text, language_code, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cat() {
        let timeline = build_timeline("cat", "en", 100.0);
        assert_eq!(timeline.phoneme_symbols().collect::<Vec<_>>(), vec!["k", "a", "t"]);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.total_duration(), 300.0);
        assert_eq!(timeline.text(), "cat");
        assert_eq!(timeline.language(), "en");

        let k = &timeline.entries()[0];
        assert_eq!((k.start_time, k.end_time), (0.0, 100.0));
        assert_eq!((k.frame_start, k.frame_end), (91, 100));
    }

    #[test]
    fn test_entries_are_contiguous() {
        let samples = [
            ("The quick brown fox, jumps!", "en", 100.0),
            ("¿Dónde está la biblioteca?", "es", 73.3),
            ("marhaba ya sa'a", "ar", 0.1),
            ("", "en", 100.0),
        ];
        for (text, language, duration) in samples {
            let timeline = build_timeline(text, language, duration);
            for pair in timeline.entries().windows(2) {
                assert_eq!(pair[0].end_time, pair[1].start_time);
            }
            let last_end = timeline.entries().last().map(|e| e.end_time).unwrap_or(0.0);
            assert_eq!(timeline.total_duration(), last_end);
            assert!(timeline.validate().is_ok());
        }
    }

    #[test]
    fn test_neutral_entries_take_neutral_frames() {
        let timeline = build_timeline("a b", "en", 50.0);
        let gap = &timeline.entries()[1];
        assert_eq!(gap.phoneme, "_");
        assert_eq!((gap.frame_start, gap.frame_end), (0, 0));
    }

    #[test]
    fn test_invalid_duration_is_clamped() {
        let timeline = build_timeline("cat", "en", -10.0);
        assert_eq!(timeline.total_duration(), 0.0);
        let timeline = build_timeline("cat", "en", f64::NAN);
        assert_eq!(timeline.total_duration(), 0.0);
    }

    #[test]
    fn test_builds_share_tables_across_threads() {
        let texts = ["cat", "perro", "shukran", "the ship"];
        let languages = ["en", "es", "ar", "en"];
        let timelines: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = texts
                .iter()
                .zip(languages)
                .map(|(text, language)| scope.spawn(move || build_timeline(text, language, 90.0)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for ((timeline, text), language) in timelines.iter().zip(texts).zip(languages) {
            assert_eq!(timeline.entries(), build_timeline(text, language, 90.0).entries());
        }
    }

    #[test]
    fn test_each_build_gets_a_new_id() {
        let a = build_timeline("cat", "en", 100.0);
        let b = build_timeline("cat", "en", 100.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_json_round_trip_validates() {
        let timeline = build_timeline("hello", "en", 80.0);
        let json = timeline.to_json().unwrap();
        assert!(json.contains("\"totalDuration\""));
        assert!(json.contains("\"frameStart\""));
        let loaded = PhonemeTimeline::from_json(&json).unwrap();
        assert_eq!(loaded, timeline);
    }

    #[test]
    fn test_ron_round_trip() {
        let timeline = build_timeline("shoe", "en", 120.0);
        let ron = timeline.to_ron().unwrap();
        let loaded = PhonemeTimeline::from_ron(&ron).unwrap();
        assert_eq!(loaded, timeline);
    }

    #[test]
    fn test_validate_rejects_gaps_and_bad_totals() {
        let entries = vec![
            PhonemeTimelineEntry::new("k", 0.0, 100.0),
            PhonemeTimelineEntry::new("a", 120.0, 200.0),
        ];
        let timeline = PhonemeTimeline::from_entries("ka", "en", entries);
        assert!(matches!(
            timeline.validate(),
            Err(TimelineError::NotContiguous { index: 1, .. })
        ));

        let mut json: serde_json::Value =
            serde_json::from_str(&build_timeline("cat", "en", 100.0).to_json().unwrap()).unwrap();
        json["totalDuration"] = serde_json::json!(999.0);
        assert!(matches!(
            PhonemeTimeline::from_json(&json.to_string()),
            Err(TimelineError::DurationMismatch { .. })
        ));

        let backwards = PhonemeTimeline::from_entries(
            "k",
            "en",
            vec![PhonemeTimelineEntry::new("k", 50.0, 10.0)],
        );
        assert!(matches!(
            backwards.validate(),
            Err(TimelineError::InvalidEntry { index: 0, .. })
        ));
    }
}
