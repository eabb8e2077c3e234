//! Frame pacing for the render loop.

use std::time::{Duration, Instant};

/// Paces frame callbacks to a fixed target rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Time between consecutive frames.
    frame_interval: Duration,
    /// When the clock was started.
    started: Instant,
    /// When the last frame ran.
    last_frame: Instant,
    /// Number of frames run so far.
    frames: u64,
}

impl FrameClock {
    /// Create a clock targeting `fps` frames per second, starting at `now`.
    pub fn new(fps: u32, now: Instant) -> Self {
        let fps = fps.max(1);
        Self {
            frame_interval: Duration::from_secs(1) / fps,
            started: now,
            last_frame: now,
            frames: 0,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether a new frame should run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_frame) >= self.frame_interval
    }

    /// How long the loop may wait for input before the next frame is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.frame_interval
            .saturating_sub(now.saturating_duration_since(self.last_frame))
    }

    /// Record that a frame ran at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.last_frame = now;
        self.frames += 1;
    }

    /// Time since the clock started.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}
