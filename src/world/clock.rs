/// Virtual session clock measured in seconds.
///
/// One game day is a fixed number of virtual seconds; the scheduler converts its
/// per-day rates (spawn attempts, decay) through this clock rather than touching
/// wall time, so a whole session can be simulated as fast as `advance` is called.
#[derive(Debug, Clone, Copy)]
pub struct WorldClock {
    seconds: f64,
    seconds_per_day: f64,
}

pub const DEFAULT_SECONDS_PER_DAY: f64 = 1200.0;

impl WorldClock {
    pub fn new(seconds_per_day: f64) -> Self {
        let seconds_per_day = if seconds_per_day <= 0.0 {
            DEFAULT_SECONDS_PER_DAY
        } else {
            seconds_per_day
        };
        Self {
            seconds: 0.0,
            seconds_per_day,
        }
    }

    /// Virtual seconds since the session started.
    pub fn now(&self) -> f64 {
        self.seconds
    }

    pub fn seconds_per_day(&self) -> f64 {
        self.seconds_per_day
    }

    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.seconds += f64::from(dt);
        }
    }

    /// Restart the session timeline at zero.
    pub fn reset(&mut self) {
        self.seconds = 0.0;
    }

    pub fn days_to_seconds(&self, days: f32) -> f64 {
        f64::from(days) * self.seconds_per_day
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS_PER_DAY)
    }
}
