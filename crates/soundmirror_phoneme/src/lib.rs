// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phoneme timelines for SoundMirror.
//!
//! This crate turns practice text into time-stamped articulation events:
//! - Phoneme frame registry (symbol to sprite atlas range)
//! - Per-language grapheme rule tables
//! - Timeline building with fixed phoneme slots
//! - Re-anchoring to speech engine word boundaries
//! - Frame interpolation at a playback time
//!
//! ## Architecture
//!
//! Registry and rule tables are immutable process-wide constants and can be
//! shared freely between threads. Timelines are plain values: they are built
//! once, never patched, and replaced wholesale when better timing arrives.

pub mod grapheme;
pub mod interpolate;
pub mod registry;
pub mod rules;
pub mod timeline;
pub mod tts;

pub use grapheme::{is_separator, text_to_phonemes, GraphemeTrie};
pub use interpolate::{entry_at_time, frame_at_time, FrameSample};
pub use registry::{
    alias_for, neutral_frame, phoneme_frame, phoneme_frame_or_neutral, supported_phonemes,
    PhonemeFrame, ATLAS_LAST_FRAME, FRAMES_PER_PHONEME, NEUTRAL_PHONEME,
};
pub use rules::{language_rules, rules_for, supported_languages, LanguageRules, FALLBACK_LANGUAGE};
pub use timeline::{
    build_timeline, PhonemeTimeline, PhonemeTimelineEntry, TimelineError, TimelineId,
    DEFAULT_PHONEME_DURATION_MS,
};
pub use tts::{adjust_timeline_from_tts, BoundaryError, WordBoundary, WORD_GAP_MS};
