//! Frame pacing for the host loop.

use crate::scene::{Scene, TickReport};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn wall_clock_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Runs one scene tick per frame at a fixed rate and keeps an FPS estimate.
pub struct FrameScheduler {
    pub frame_interval: Duration,
    next_frame: Instant,
    /// Frames run so far
    pub frames: u64,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    pub fps: f64,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next_frame: now,
            frames: 0,
            frames_since_last_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    /// Time left until the next frame is due.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Runs one frame: ticks the scene unless paused, then hands it to
    /// `submit` for drawing.
    pub fn frame<R>(
        &mut self,
        scene: &mut Scene,
        now_ms: f64,
        paused: bool,
        submit: impl FnOnce(&Scene, Option<TickReport>) -> R,
    ) -> R {
        let now = Instant::now();
        self.next_frame += self.frame_interval;
        // Don't try to catch up after a stall.
        if self.next_frame < now {
            self.next_frame = now + self.frame_interval;
        }

        let report = if paused { None } else { Some(scene.tick(now_ms)) };
        self.frames += 1;
        self.update_fps(now);
        submit(scene, report)
    }

    fn update_fps(&mut self, now: Instant) {
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}
