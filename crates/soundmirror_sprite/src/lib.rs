// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mouth sprite scheduler for SoundMirror.
//!
//! This crate plays a phoneme timeline as two synchronized sprite views:
//! - Front (master) and side (slave) frame indices, always equal
//! - Sprite image path resolution
//! - Play / pause / seek / stop state machine
//! - Rate-limited updates driven by an injected clock
//!
//! ## Architecture
//!
//! The scheduler is single-threaded and cooperative. The host owns the frame
//! loop and calls back into the scheduler; each scheduler plays exactly one
//! timeline, so concurrent animations need one scheduler each.

pub mod clock;
pub mod config;
pub mod driver;
pub mod scheduler;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfigError, SchedulerConfig, CONFIG_FORMAT_VERSION, DEFAULT_BASE_PATH, DEFAULT_FPS,
};
pub use driver::{drive, run_blocking};
pub use scheduler::{
    create_sprite_scheduler, CompletionCallback, PlaybackState, SpriteScheduler,
    SpriteUpdateCallback,
};
pub use state::{sanitize_phoneme, sprite_path, SpriteState, SpriteView};
