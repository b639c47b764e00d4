// SPDX-License-Identifier: MIT OR Apache-2.0
//! Blocking frame loop for hosts without their own display callback.

use crate::clock::Clock;
use crate::scheduler::SpriteScheduler;
use std::time::Duration;

/// Drive `scheduler` until no frame is pending.
///
/// `wait_for_frame` runs before every frame and stands in for the host's
/// display refresh. Returns the number of frames delivered.
pub fn drive<C, W>(scheduler: &mut SpriteScheduler<C>, mut wait_for_frame: W) -> usize
where
    C: Clock,
    W: FnMut(),
{
    let mut frames = 0;
    while scheduler.has_pending_frame() {
        wait_for_frame();
        scheduler.on_animation_frame();
        frames += 1;
    }
    frames
}

/// Drive `scheduler` on the current thread, sleeping `refresh` between frames
pub fn run_blocking<C: Clock>(scheduler: &mut SpriteScheduler<C>, refresh: Duration) -> usize {
    drive(scheduler, || std::thread::sleep(refresh))
}
