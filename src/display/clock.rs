//! Frame counter for animated populations.

/// Frame index fed to animated networks.
///
/// Advances once per drawn frame and wraps at the canvas width. Evolving
/// resets it so every generation starts from frame 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    t: usize,
    period: usize,
}

impl FrameClock {
    /// A clock at frame 0 cycling through `period` frames (at least one).
    pub fn new(period: usize) -> Self {
        Self {
            t: 0,
            period: period.max(1),
        }
    }

    /// Current frame index, always below the period.
    #[inline]
    pub fn time(&self) -> usize {
        self.t
    }

    #[inline]
    pub fn period(&self) -> usize {
        self.period
    }

    /// Move to the next frame, wrapping to 0 after the last.
    pub fn tick(&mut self) {
        self.t = (self.t + 1) % self.period;
    }

    pub fn reset(&mut self) {
        self.t = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_wraps() {
        let mut clock = FrameClock::new(3);
        let seen: Vec<usize> = (0..7)
            .map(|_| {
                let t = clock.time();
                clock.tick();
                t
            })
            .collect();
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new(32);
        clock.tick();
        clock.tick();
        assert_eq!(clock.time(), 2);
        clock.reset();
        assert_eq!(clock.time(), 0);
    }

    #[test]
    fn test_zero_period_holds_frame_zero() {
        let mut clock = FrameClock::new(0);
        clock.tick();
        assert_eq!((clock.time(), clock.period()), (0, 1));
    }
}
