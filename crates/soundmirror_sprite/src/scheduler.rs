// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sprite scheduler.
//!
//! Plays one phoneme timeline against a [`Clock`] and emits a synchronized
//! front/side [`SpriteState`] at a rate-limited pace.
//!
//! The host drives the loop the way a browser drives `requestAnimationFrame`:
//! while [`SpriteScheduler::has_pending_frame`] is true it calls
//! [`SpriteScheduler::on_animation_frame`] once per display refresh. At most
//! one frame request is outstanding, and pausing or stopping withdraws it.

use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::state::SpriteState;
use soundmirror_phoneme::{frame_at_time, PhonemeTimeline, TimelineId};

/// Callback receiving every emitted state
pub type SpriteUpdateCallback = Box<dyn FnMut(&SpriteState)>;

/// Callback fired once when playback reaches the end
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing playing; rest pose
    #[default]
    Idle,
    /// Clock running, frame loop active
    Playing,
    /// Frozen at an elapsed time
    Paused,
    /// Reached the end; behaves like idle
    Completed,
}

impl PlaybackState {
    /// Whether the frame loop is running
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Clock-driven playback of a single phoneme timeline
pub struct SpriteScheduler<C: Clock = SystemClock> {
    config: SchedulerConfig,
    clock: C,
    timeline: Option<PhonemeTimeline>,
    state: PlaybackState,
    /// Clock time at which elapsed time was 0 (valid while playing)
    start_time: f64,
    /// Elapsed time while not playing
    offset: f64,
    last_emit_time: f64,
    frame_interval: f64,
    pending_frame: bool,
    on_update: Option<SpriteUpdateCallback>,
    on_complete: Option<CompletionCallback>,
}

impl SpriteScheduler<SystemClock> {
    /// Scheduler on the system clock
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> SpriteScheduler<C> {
    /// Create a scheduler reading time from `clock`
    pub fn new(config: SchedulerConfig, clock: C) -> Self {
        let frame_interval = config.frame_interval_ms();
        Self {
            config,
            clock,
            timeline: None,
            state: PlaybackState::Idle,
            start_time: 0.0,
            offset: 0.0,
            last_emit_time: 0.0,
            frame_interval,
            pending_frame: false,
            on_update: None,
            on_complete: None,
        }
    }

    /// Register the state listener without starting playback.
    ///
    /// [`play`](Self::play) replaces it.
    pub fn set_update_listener(&mut self, on_update: impl FnMut(&SpriteState) + 'static) {
        self.on_update = Some(Box::new(on_update));
    }

    /// Load a timeline, replacing the current one.
    ///
    /// Always returns to idle and emits the neutral state.
    pub fn set_timeline(&mut self, timeline: PhonemeTimeline) {
        tracing::debug!(
            "Loading timeline {:?} ({} entries, {} ms)",
            timeline.id(),
            timeline.len(),
            timeline.total_duration()
        );
        self.timeline = Some(timeline);
        self.on_complete = None;
        self.reset();
    }

    /// Start or resume playback.
    ///
    /// Playback starts from the current offset: 0 after loading, stopping or
    /// completing; the paused position after [`pause`](Self::pause); the
    /// target of a [`seek_to`](Self::seek_to) made while not playing.
    /// Without a loaded timeline this logs an error and does nothing.
    pub fn play(
        &mut self,
        on_update: impl FnMut(&SpriteState) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) {
        if self.timeline.is_none() {
            tracing::error!("play() called with no timeline loaded");
            return;
        }

        let elapsed = self.current_time();
        self.pending_frame = false;
        self.on_update = Some(Box::new(on_update));
        self.on_complete = Some(Box::new(on_complete));

        let now = self.clock.now_ms();
        self.start_time = now - elapsed;
        self.last_emit_time = now;
        self.state = PlaybackState::Playing;

        self.tick();
    }

    /// Freeze playback at the current elapsed time
    pub fn pause(&mut self) {
        self.pending_frame = false;
        if self.state == PlaybackState::Playing {
            self.offset = self.clock.now_ms() - self.start_time;
            self.state = PlaybackState::Paused;
        }
    }

    /// Pause and rewind to the start
    pub fn stop(&mut self) {
        self.pause();
        self.reset();
    }

    /// Rewind to the start, go idle and emit the neutral state
    pub fn reset(&mut self) {
        self.pending_frame = false;
        self.state = PlaybackState::Idle;
        self.start_time = 0.0;
        self.offset = 0.0;
        self.last_emit_time = 0.0;
        let neutral = self.neutral_state();
        self.emit(&neutral);
    }

    /// Jump to `time_ms` and emit the state there immediately.
    ///
    /// Negative times seek to 0. Ignored when no timeline is loaded.
    pub fn seek_to(&mut self, time_ms: f64) {
        if self.timeline.is_none() {
            tracing::debug!("seek_to({time_ms}) ignored, no timeline loaded");
            return;
        }

        let time_ms = time_ms.max(0.0);
        if self.state == PlaybackState::Playing {
            self.start_time = self.clock.now_ms() - time_ms;
        } else {
            self.offset = time_ms;
        }

        let state = self.sprite_state_at(time_ms);
        self.emit(&state);
    }

    /// Whether a frame request is outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame
    }

    /// Host per-frame callback.
    ///
    /// Does nothing unless a frame was requested, so a callback that fires
    /// after a pause or stop is harmless.
    pub fn on_animation_frame(&mut self) {
        if !std::mem::take(&mut self.pending_frame) {
            return;
        }
        self.tick();
    }

    fn tick(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(total_duration) = self.timeline.as_ref().map(PhonemeTimeline::total_duration)
        else {
            return;
        };

        let now = self.clock.now_ms();
        let elapsed = now - self.start_time;

        if elapsed >= total_duration {
            self.complete();
            return;
        }

        if now - self.last_emit_time >= self.frame_interval {
            self.last_emit_time = now;
            let state = self.sprite_state_at(elapsed);
            self.emit(&state);
        }

        self.pending_frame = true;
    }

    fn complete(&mut self) {
        self.pending_frame = false;
        self.state = PlaybackState::Completed;
        self.offset = 0.0;
        tracing::debug!("Playback of {:?} complete", self.timeline_id());

        let neutral = self.neutral_state();
        self.emit(&neutral);
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }

    fn emit(&mut self, state: &SpriteState) {
        if let Some(on_update) = self.on_update.as_mut() {
            on_update(state);
        }
    }

    fn language(&self) -> &str {
        self.timeline
            .as_ref()
            .map_or(self.config.default_language.as_str(), PhonemeTimeline::language)
    }

    /// Sprite state at `time_ms` of the loaded timeline, without emitting it
    pub fn sprite_state_at(&self, time_ms: f64) -> SpriteState {
        let Some(timeline) = self.timeline.as_ref() else {
            return self.neutral_state();
        };
        let sample = frame_at_time(timeline, time_ms);
        SpriteState::from_sample(
            &self.config.base_path,
            timeline.language(),
            &sample,
            self.state.is_playing(),
        )
    }

    /// Closed-mouth rest state
    pub fn neutral_state(&self) -> SpriteState {
        SpriteState::neutral(&self.config.base_path, self.language())
    }

    /// Elapsed playback time in milliseconds
    pub fn current_time(&self) -> f64 {
        match self.state {
            PlaybackState::Playing => self.clock.now_ms() - self.start_time,
            PlaybackState::Idle | PlaybackState::Paused | PlaybackState::Completed => self.offset,
        }
    }

    /// Duration of the loaded timeline, or 0
    pub fn total_duration(&self) -> f64 {
        self.timeline.as_ref().map_or(0.0, PhonemeTimeline::total_duration)
    }

    /// Whether playback is running
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Loaded timeline
    pub fn timeline(&self) -> Option<&PhonemeTimeline> {
        self.timeline.as_ref()
    }

    /// Id of the loaded timeline
    pub fn timeline_id(&self) -> Option<TimelineId> {
        self.timeline.as_ref().map(PhonemeTimeline::id)
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

/// Scheduler on the system clock with default settings rooted at `base_path`
pub fn create_sprite_scheduler(base_path: impl Into<String>) -> SpriteScheduler<SystemClock> {
    SpriteScheduler::with_config(SchedulerConfig::with_base_path(base_path))
}
