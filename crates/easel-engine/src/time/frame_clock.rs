use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Number of ticks before this one.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// show up as one enormous frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Total ticks so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
