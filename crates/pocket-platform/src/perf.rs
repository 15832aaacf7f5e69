//! Frame rate measurement and pacing.

use crate::services::Clock;

/// Frames-per-second estimate, recomputed once per elapsed second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    fps: f32,
    frames: u32,
    last_tick: u64,
}

impl FpsCounter {
    pub fn new(now_ms: u64) -> Self {
        Self {
            fps: 0.0,
            frames: 0,
            last_tick: now_ms,
        }
    }

    /// Count one frame and return the current estimate.
    pub fn tick(&mut self, now_ms: u64) -> f32 {
        self.frames += 1;
        let elapsed = now_ms.saturating_sub(self.last_tick);
        if elapsed >= 1000 {
            self.fps = self.frames as f32 * 1000.0 / elapsed as f32;
            self.last_tick = now_ms;
            self.frames = 0;
        }
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Sleeps so that consecutive frames are at least `1000 / fps` ms apart.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval_ms: u64,
    last_tick: Option<u64>,
}

impl FrameLimiter {
    /// `fps == 0` disables limiting.
    pub fn new(fps: u32) -> Self {
        Self {
            interval_ms: if fps == 0 { 0 } else { 1000 / u64::from(fps) },
            last_tick: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Block until the frame interval has passed since the previous call.
    pub fn wait<C: Clock + ?Sized>(&mut self, clock: &C) {
        if let Some(last) = self.last_tick {
            let elapsed = clock.ticks_ms().saturating_sub(last);
            if elapsed < self.interval_ms {
                clock.sleep_ms(self.interval_ms - elapsed);
            }
        }
        self.last_tick = Some(clock.ticks_ms());
    }
}
