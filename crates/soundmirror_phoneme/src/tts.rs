// SPDX-License-Identifier: MIT OR Apache-2.0
//! Re-anchoring timelines to speech engine word boundaries.
//!
//! An estimated timeline from [`build_timeline`](crate::timeline::build_timeline)
//! is replaced wholesale once the speech engine reports when each word was
//! actually spoken.

use crate::grapheme::text_to_phonemes;
use crate::registry::{neutral_frame, NEUTRAL_PHONEME};
use crate::timeline::{PhonemeTimeline, PhonemeTimelineEntry};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Length of the neutral entry inserted between consecutive words, in ms
pub const WORD_GAP_MS: f64 = 50.0;

/// When a word was spoken, as reported by a speech engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBoundary {
    /// The spoken word
    pub word: String,
    /// Start time in milliseconds
    pub start_time: f64,
    /// End time in milliseconds
    pub end_time: f64,
}

impl WordBoundary {
    /// Create a word boundary
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
        }
    }

    /// Reported duration, never negative
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Parse a JSON array of `{ word, startTime, endTime }` events
    pub fn parse_events(json: &str) -> Result<Vec<Self>, BoundaryError> {
        let events: Vec<Self> = serde_json::from_str(json)?;
        for (index, event) in events.iter().enumerate() {
            if !event.start_time.is_finite() || !event.end_time.is_finite() {
                return Err(BoundaryError::NonFinite {
                    index,
                    word: event.word.clone(),
                });
            }
        }
        Ok(events)
    }
}

/// Errors raised when decoding word boundary events
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// JSON decoding failed
    #[error("Invalid word boundary JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An event carries a non-finite time
    #[error("Word boundary {index} ({word:?}) has a non-finite time")]
    NonFinite {
        /// Index of the event
        index: usize,
        /// Its word
        word: String,
    },
}

/// Derive a new timeline from authoritative word boundaries.
///
/// Each word is re-tokenized with the timeline's language and its reported
/// duration is split evenly across its own phonemes; the last phoneme ends
/// exactly at the word's end time. A neutral entry follows every word except
/// the last. It lasts at least [`WORD_GAP_MS`] and stretches to the next
/// word's start, so the result stays time-contiguous.
///
/// Where the next word starts before that neutral entry ends, or boundaries
/// arrive out of order, the earlier entry keeps the overlapping time and the
/// later phonemes are clipped to start where it ends (possibly to zero
/// length). Entries therefore remain sorted by start time.
///
/// The input timeline is never modified. An empty boundary list returns it
/// unchanged.
pub fn adjust_timeline_from_tts<'a>(
    timeline: &'a PhonemeTimeline,
    word_boundaries: &[WordBoundary],
) -> Cow<'a, PhonemeTimeline> {
    if word_boundaries.is_empty() {
        tracing::debug!("No word boundaries, keeping estimated timeline {:?}", timeline.id());
        return Cow::Borrowed(timeline);
    }

    let neutral = neutral_frame();
    let mut entries = Vec::new();
    let mut cursor = f64::NEG_INFINITY;

    for (index, boundary) in word_boundaries.iter().enumerate() {
        if boundary.end_time < boundary.start_time {
            tracing::warn!(
                "Word boundary {:?} ends before it starts ({} < {})",
                boundary.word,
                boundary.end_time,
                boundary.start_time
            );
        }
        if boundary.start_time < cursor {
            tracing::debug!(
                "Word boundary {:?} starts at {} inside the previous entry ending at {}",
                boundary.word,
                boundary.start_time,
                cursor
            );
        }

        let word_start = boundary.start_time;
        let word_end = word_start + boundary.duration();
        let phonemes = text_to_phonemes(&boundary.word, timeline.language());
        let count = phonemes.len();
        let slot = boundary.duration() / count.max(1) as f64;

        for (i, phoneme) in phonemes.into_iter().enumerate() {
            let start = (word_start + slot * i as f64).max(cursor);
            let end = if i + 1 == count {
                word_end
            } else {
                word_start + slot * (i + 1) as f64
            };
            let end = end.max(start);
            entries.push(PhonemeTimelineEntry::new(phoneme, start, end));
            cursor = end;
        }
        let word_end = word_end.max(cursor);

        if let Some(next) = word_boundaries.get(index + 1) {
            let gap_end = (word_end + WORD_GAP_MS).max(next.start_time);
            entries.push(PhonemeTimelineEntry::with_frame(
                NEUTRAL_PHONEME,
                neutral,
                word_end,
                gap_end,
            ));
            cursor = gap_end;
        } else {
            cursor = word_end;
        }
    }

    Cow::Owned(PhonemeTimeline::from_entries(
        timeline.text(),
        timeline.language(),
        entries,
    ))
}
