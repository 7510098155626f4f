use std::time::{Duration, Instant};

/// Longest step the simulation will take in one frame.
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Turns frame timestamps into a bounded step and a running elapsed time.
#[derive(Debug, Default)]
pub struct Clock {
    previous: Option<Instant>,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the step in seconds for a frame starting at `now`.
    ///
    /// The first frame yields 0. Long stalls (suspended terminal, debugger)
    /// are clamped to [`MAX_FRAME_DT`] and a clock going backwards yields 0.
    pub fn advance(&mut self, now: Instant) -> f32 {
        let step = match self.previous {
            Some(prev) => now.saturating_duration_since(prev).min(MAX_FRAME_DT),
            None => Duration::ZERO,
        };
        self.previous = Some(now);
        let dt = step.as_secs_f64();
        self.elapsed += dt;
        dt as f32
    }

    /// Seconds accumulated across all frames.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_no_step() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(Instant::now()), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn step_is_frame_delta_in_seconds() {
        let mut clock = Clock::new();
        let t0 = Instant::now();
        clock.advance(t0);
        let dt = clock.advance(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        assert!((clock.elapsed() - 0.016).abs() < 1e-9);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = Clock::new();
        let t0 = Instant::now();
        clock.advance(t0);
        let dt = clock.advance(t0 + Duration::from_secs(5));
        assert!((dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn backwards_time_yields_zero() {
        let mut clock = Clock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.advance(t0);
        assert_eq!(clock.advance(t0 - Duration::from_millis(500)), 0.0);
    }

    #[test]
    fn elapsed_never_decreases() {
        let mut clock = Clock::new();
        let t0 = Instant::now();
        let mut last = 0.0;
        for ms in [0u64, 10, 5, 300, 310, 311] {
            clock.advance(t0 + Duration::from_millis(ms));
            assert!(clock.elapsed() >= last);
            last = clock.elapsed();
        }
    }
}
