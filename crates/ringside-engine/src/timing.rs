//! Frame timing.
//!
//! Fixed-timestep accumulator feeding the fight controller in whole
//! milliseconds-per-frame steps.

/// Fixed-step frame clock.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Step length (ms)
    fixed_dt: f32,
    /// Unconsumed time (ms)
    accumulator: f32,
    /// Largest delta accepted in one call (ms)
    max_dt: f32,
    /// Cap on steps returned by one call
    max_steps: u32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

#[allow(dead_code)]
impl FrameTiming {
    /// Create a clock stepping at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            fixed_dt: 1000.0 / target_fps as f32,
            accumulator: 0.0,
            max_dt: 250.0, // Max 250ms delta
            max_steps: 10,
        }
    }

    /// Step length in milliseconds.
    #[must_use]
    pub const fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Accumulate `dt` ms of wall time.
    /// Returns the number of fixed steps that should be simulated.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_dt) } else { 0.0 };
        self.accumulator += dt;

        let mut count = 0;
        while self.accumulator >= self.fixed_dt && count < self.max_steps {
            self.accumulator -= self.fixed_dt;
            count += 1;
        }

        // Still behind: drop the backlog
        if self.accumulator > self.fixed_dt * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }

    /// Reset timing (after a pause or load).
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_match_elapsed_time() {
        let mut timing = FrameTiming::new(50);
        assert!((timing.fixed_dt() - 20.0).abs() < f32::EPSILON);
        assert_eq!(timing.accumulate(10.0), 0);
        assert_eq!(timing.accumulate(10.0), 1);
        assert_eq!(timing.accumulate(45.0), 2);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut timing = FrameTiming::new(100);
        // 250ms cap, 10 step cap, backlog dropped
        assert_eq!(timing.accumulate(10_000.0), 10);
        assert_eq!(timing.accumulate(0.0), 0);
    }

    #[test]
    fn test_bad_delta_ignored() {
        let mut timing = FrameTiming::new(60);
        assert_eq!(timing.accumulate(-100.0), 0);
        assert_eq!(timing.accumulate(f32::NAN), 0);
        timing.reset();
        assert_eq!(timing.accumulate(timing.fixed_dt()), 1);
    }
}
