//! Frame pacing utilities
//!
//! The editor loop is not frame-rate controlled: each frame ends with a fixed
//! idle wait to bound CPU usage, and physics advances by a fixed step per frame.

use std::time::{Duration, Instant};

/// Fixed idle wait between frames, plus frame counters for diagnostics
#[derive(Debug)]
pub struct FramePacer {
    idle_wait: Duration,
    started: Instant,
    last_frame: Instant,
    last_frame_time: Duration,
    frame_count: u64,
}

impl FramePacer {
    /// Create a pacer that sleeps `idle_wait` at the end of every frame
    pub fn new(idle_wait: Duration) -> Self {
        let now = Instant::now();
        Self {
            idle_wait,
            started: now,
            last_frame: now,
            last_frame_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Create a pacer from a millisecond count
    pub fn from_millis(idle_wait_ms: u64) -> Self {
        Self::new(Duration::from_millis(idle_wait_ms))
    }

    /// Finish the current frame: record its duration, then yield for the idle wait
    pub fn finish_frame(&mut self) {
        let now = Instant::now();
        self.last_frame_time = now.duration_since(self.last_frame);
        self.frame_count += 1;

        if !self.idle_wait.is_zero() {
            std::thread::sleep(self.idle_wait);
        }
        self.last_frame = Instant::now();
    }

    /// Number of frames finished so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Configured idle wait
    pub fn idle_wait(&self) -> Duration {
        self.idle_wait
    }

    /// Work time of the most recent frame, excluding the idle wait
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Average frames per second since the pacer was created
    pub fn average_fps(&self) -> f32 {
        let total = self.started.elapsed().as_secs_f32();
        if total > 0.0 {
            self.frame_count as f32 / total
        } else {
            0.0
        }
    }
}
