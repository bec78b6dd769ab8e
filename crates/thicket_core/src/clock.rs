use std::time::Duration;

/// Upper bound on steps drained per `advance`, so a stalled host does not
/// spiral trying to catch up.
pub const MAX_CATCH_UP: u32 = 8;

/// Fixed-timestep accumulator. Wall-clock time goes in, whole ticks of
/// `step` come out.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    accumulated: Duration,
    time_scale: f64,
}

impl FixedStep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / f64::from(tick_rate.max(1))),
            accumulated: Duration::ZERO,
            time_scale: 1.0,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn dt(&self) -> f64 {
        self.step.as_secs_f64()
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.clamp(0.0, 16.0);
    }

    /// Adds elapsed wall time and returns how many ticks are due. Overflow
    /// beyond [`MAX_CATCH_UP`] steps is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed.mul_f64(self.time_scale);
        let mut due = 0;
        while self.accumulated >= self.step && due < MAX_CATCH_UP {
            self.accumulated -= self.step;
            due += 1;
        }
        if due == MAX_CATCH_UP && self.accumulated >= self.step {
            tracing::debug!(dropped = ?self.accumulated, "clock fell behind");
            self.accumulated = Duration::ZERO;
        }
        due
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f64 {
        self.accumulated.as_secs_f64() / self.step.as_secs_f64()
    }
}
