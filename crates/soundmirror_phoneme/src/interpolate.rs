// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame interpolation over a timeline.

use crate::registry::{interpolate_frame, NEUTRAL_PHONEME};
use crate::timeline::{PhonemeTimeline, PhonemeTimelineEntry};
use serde::Serialize;

/// Sprite frame resolved for one instant of playback
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample<'a> {
    /// Atlas frame index
    pub frame_index: u32,
    /// Active phoneme symbol
    pub phoneme: &'a str,
    /// Progress through the active phoneme, in `[0, 1]`
    pub progress: f64,
}

impl FrameSample<'static> {
    /// Frame 0, neutral phoneme, no progress
    pub const NEUTRAL: Self = Self {
        frame_index: 0,
        phoneme: NEUTRAL_PHONEME,
        progress: 0.0,
    };
}

impl FrameSample<'_> {
    /// Whether this is the neutral pose
    pub fn is_neutral(&self) -> bool {
        self.phoneme == NEUTRAL_PHONEME && self.frame_index == 0
    }
}

/// Entry whose span contains `time`.
///
/// Binary search for the last entry starting at or before `time`, so entries
/// must be sorted by start time (timelines from [`build_timeline`] and
/// [`adjust_timeline_from_tts`] always are). Zero-length entries are never
/// returned. Returns `None` before the first entry and after the last.
///
/// [`build_timeline`]: crate::timeline::build_timeline
/// [`adjust_timeline_from_tts`]: crate::tts::adjust_timeline_from_tts
pub fn entry_at_time(timeline: &PhonemeTimeline, time: f64) -> Option<&PhonemeTimelineEntry> {
    let entries = timeline.entries();
    let after = entries.partition_point(|e| e.start_time <= time);
    let entry = entries.get(after.checked_sub(1)?)?;
    entry.contains(time).then_some(entry)
}

/// Resolve the sprite frame for `current_time` (ms).
///
/// Before 0, at or after the total duration, outside every entry, or for a
/// NaN time the result is [`FrameSample::NEUTRAL`]. Otherwise the frame index
/// ramps linearly across the active entry's frame range.
pub fn frame_at_time(timeline: &PhonemeTimeline, current_time: f64) -> FrameSample<'_> {
    if !(current_time >= 0.0 && current_time < timeline.total_duration()) {
        return FrameSample::NEUTRAL;
    }

    let Some(entry) = entry_at_time(timeline, current_time) else {
        return FrameSample::NEUTRAL;
    };

    let duration = entry.duration();
    let progress = if duration > 0.0 {
        ((current_time - entry.start_time) / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };

    FrameSample {
        frame_index: interpolate_frame(entry.frame_start, entry.frame_end, progress),
        phoneme: &entry.phoneme,
        progress,
    }
}
