use std::time::Instant;

/// Turns host frame timestamps into per-tick elapsed milliseconds.
///
/// The first frame after construction or `restart` reports zero, so time
/// spent paused or backgrounded is never fed into a tick. Long frames are
/// clamped to `max_frame_ms`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_frame_ms: f32,
}

impl FrameClock {
    pub fn new(max_frame_ms: f32) -> Self {
        Self {
            last: None,
            max_frame_ms,
        }
    }

    /// Elapsed milliseconds since the previous frame.
    pub fn frame(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32() * 1000.0)
            .unwrap_or(0.0);
        self.last = Some(now);
        if elapsed > self.max_frame_ms {
            tracing::debug!(elapsed, clamp = self.max_frame_ms, "long frame clamped");
        }
        elapsed.min(self.max_frame_ms)
    }

    /// Forget the previous frame, e.g. on resume.
    pub fn restart(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_frame_is_zero() {
        let mut clock = FrameClock::new(250.0);
        assert_eq!(clock.frame(Instant::now()), 0.0);
    }

    #[test]
    fn reports_elapsed_between_frames() {
        let mut clock = FrameClock::new(250.0);
        let t0 = Instant::now();
        clock.frame(t0);
        let ms = clock.frame(t0 + Duration::from_millis(16));
        assert!((ms - 16.0).abs() < 0.01);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut clock = FrameClock::new(250.0);
        let t0 = Instant::now();
        clock.frame(t0);
        assert_eq!(clock.frame(t0 + Duration::from_secs(10)), 250.0);
    }

    #[test]
    fn restart_skips_paused_interval() {
        let mut clock = FrameClock::new(250.0);
        let t0 = Instant::now();
        clock.frame(t0);
        clock.restart();
        assert_eq!(clock.frame(t0 + Duration::from_millis(200)), 0.0);
        let ms = clock.frame(t0 + Duration::from_millis(210));
        assert!((ms - 10.0).abs() < 0.01);
    }

    #[test]
    fn time_going_backwards_is_zero() {
        let mut clock = FrameClock::new(250.0);
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.frame(t0);
        assert_eq!(clock.frame(t0 - Duration::from_millis(5)), 0.0);
    }
}
