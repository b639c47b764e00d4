// SPDX-License-Identifier: MIT OR Apache-2.0
//! Two-view sprite state and sprite path resolution.
//!
//! Sprite files live at
//! `{base}/sprites/{view}/{language}/{phoneme}_{frame:04}.png`, where the
//! phoneme symbol is mapped to a filesystem-safe token.

use serde::Serialize;
use soundmirror_phoneme::{FrameSample, NEUTRAL_PHONEME};

/// Camera view of the mouth sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteView {
    /// Front (lips) view, the master
    Front,
    /// Side (tongue and jaw) view, slaved to the front view
    Side,
}

impl SpriteView {
    /// Directory name of the view
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Side => "side",
        }
    }
}

/// Map a phoneme symbol to a filesystem-safe token.
///
/// Symbols without a mapping pass through unchanged.
pub fn sanitize_phoneme(phoneme: &str) -> &str {
    match phoneme {
        "ɛ" => "eh",
        "ʃ" => "sh",
        "θ" => "th",
        "ŋ" => "ng",
        "tʃ" => "ch",
        "ʔ" => "glottal",
        "ɬ" => "welsh_ll",
        "ǃ" => "click",
        NEUTRAL_PHONEME => "neutral",
        other => other,
    }
}

/// Path of one sprite frame image
pub fn sprite_path(
    base_path: &str,
    view: SpriteView,
    language: &str,
    phoneme: &str,
    frame_index: u32,
) -> String {
    format!(
        "{}/sprites/{}/{}/{}_{:04}.png",
        base_path.trim_end_matches('/'),
        view.as_str(),
        language,
        sanitize_phoneme(phoneme),
        frame_index
    )
}

/// Synchronized front/side sprite state for one update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteState {
    front_frame_index: u32,
    side_frame_index: u32,
    front_sprite_path: String,
    side_sprite_path: String,
    phoneme: String,
    progress: f64,
    is_playing: bool,
}

impl SpriteState {
    /// Resolve the state for a sampled frame.
    ///
    /// The side view always shows the front view's frame index.
    pub fn from_sample(
        base_path: &str,
        language: &str,
        sample: &FrameSample<'_>,
        is_playing: bool,
    ) -> Self {
        let front_frame_index = sample.frame_index;
        let side_frame_index = front_frame_index;
        Self {
            front_frame_index,
            side_frame_index,
            front_sprite_path: sprite_path(
                base_path,
                SpriteView::Front,
                language,
                sample.phoneme,
                front_frame_index,
            ),
            side_sprite_path: sprite_path(
                base_path,
                SpriteView::Side,
                language,
                sample.phoneme,
                side_frame_index,
            ),
            phoneme: sample.phoneme.to_string(),
            progress: sample.progress,
            is_playing,
        }
    }

    /// Closed-mouth rest pose
    pub fn neutral(base_path: &str, language: &str) -> Self {
        Self::from_sample(base_path, language, &FrameSample::NEUTRAL, false)
    }

    /// Frame index of the front view
    pub fn front_frame_index(&self) -> u32 {
        self.front_frame_index
    }

    /// Frame index of the side view (equal to the front view's)
    pub fn side_frame_index(&self) -> u32 {
        self.side_frame_index
    }

    /// Frame index shown by `view`
    pub fn frame_index(&self, view: SpriteView) -> u32 {
        match view {
            SpriteView::Front => self.front_frame_index,
            SpriteView::Side => self.side_frame_index,
        }
    }

    /// Image path of the front view
    pub fn front_sprite_path(&self) -> &str {
        &self.front_sprite_path
    }

    /// Image path of the side view
    pub fn side_sprite_path(&self) -> &str {
        &self.side_sprite_path
    }

    /// Active phoneme symbol
    pub fn phoneme(&self) -> &str {
        &self.phoneme
    }

    /// Progress through the active phoneme, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether playback was running when the state was emitted
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether this is the closed-mouth rest pose
    pub fn is_neutral(&self) -> bool {
        self.front_frame_index == 0 && self.phoneme == NEUTRAL_PHONEME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_path_format() {
        assert_eq!(
            sprite_path("/assets", SpriteView::Front, "en", "k", 91),
            "/assets/sprites/front/en/k_0091.png"
        );
        assert_eq!(
            sprite_path("/assets/", SpriteView::Side, "es", "tʃ", 195),
            "/assets/sprites/side/es/ch_0195.png"
        );
    }

    #[test]
    fn test_sanitize_phoneme() {
        assert_eq!(sanitize_phoneme("_"), "neutral");
        assert_eq!(sanitize_phoneme("ǃ"), "click");
        assert_eq!(sanitize_phoneme("a"), "a");
        assert_eq!(sanitize_phoneme("ʒ"), "ʒ");
    }

    #[test]
    fn test_side_follows_front() {
        let sample = FrameSample {
            frame_index: 155,
            phoneme: "ʃ",
            progress: 0.5,
        };
        let state = SpriteState::from_sample("/a", "en", &sample, true);
        assert_eq!(state.front_frame_index(), 155);
        assert_eq!(state.side_frame_index(), state.front_frame_index());
        assert_eq!(state.frame_index(SpriteView::Side), 155);
        assert_eq!(state.front_sprite_path(), "/a/sprites/front/en/sh_0155.png");
        assert_eq!(state.side_sprite_path(), "/a/sprites/side/en/sh_0155.png");
        assert!(state.is_playing());
    }

    #[test]
    fn test_neutral_state() {
        let state = SpriteState::neutral("/assets", "ar");
        assert!(state.is_neutral());
        assert!(!state.is_playing());
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.front_sprite_path(), "/assets/sprites/front/ar/neutral_0000.png");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(SpriteState::neutral("/assets", "en")).unwrap();
        assert_eq!(json["frontFrameIndex"], 0);
        assert_eq!(json["sideSpritePath"], "/assets/sprites/side/en/neutral_0000.png");
        assert_eq!(json["isPlaying"], false);
    }
}
