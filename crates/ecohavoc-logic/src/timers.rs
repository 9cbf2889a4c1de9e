//! Wall-clock timers for periodic game effects.
//!
//! Game cadence is expressed in seconds, independent of frame rate. A
//! [`RepeatingTimer`] reports how many whole intervals elapsed during a
//! tick, so a long frame still applies every due firing exactly once.

/// Fires every `interval` seconds. A non-positive interval fires once
/// per non-empty tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTimer {
    interval: f32,
    elapsed: f32,
}

impl RepeatingTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance by `dt` seconds; returns the number of firings.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 {
            return u32::from(dt > 0.0);
        }
        self.elapsed += dt.max(0.0);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Counts down once, then stays finished.
///
/// A zero-length countdown still fires, on its first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining: f32,
    armed: bool,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            armed: true,
        }
    }

    /// Advance by `dt`; true exactly on the tick that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.armed = false;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn finished(&self) -> bool {
        !self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_fires_on_interval() {
        let mut t = RepeatingTimer::new(5.0);
        assert_eq!(t.tick(4.9), 0);
        assert_eq!(t.tick(0.2), 1);
        assert_eq!(t.tick(4.0), 0);
    }

    #[test]
    fn long_frame_fires_multiple() {
        let mut t = RepeatingTimer::new(1.0);
        assert_eq!(t.tick(3.5), 3);
        assert_eq!(t.tick(0.5), 1);
    }

    #[test]
    fn negative_dt_ignored() {
        let mut t = RepeatingTimer::new(1.0);
        assert_eq!(t.tick(-10.0), 0);
        assert_eq!(t.tick(1.0), 1);
    }

    #[test]
    fn reset_discards_progress() {
        let mut t = RepeatingTimer::new(2.0);
        t.tick(1.9);
        t.reset();
        assert_eq!(t.tick(1.0), 0);
    }

    #[test]
    fn zero_interval_fires_once_per_tick() {
        let mut t = RepeatingTimer::new(0.0);
        assert_eq!(t.tick(0.5), 1);
        assert_eq!(t.tick(10.0), 1);
        assert_eq!(t.tick(0.0), 0);
    }

    #[test]
    fn countdown_fires_once() {
        let mut c = Countdown::new(2.0);
        assert!(!c.tick(1.0));
        assert!(c.tick(1.5));
        assert!(c.finished());
        assert!(!c.tick(1.0));
    }

    #[test]
    fn zero_countdown_fires_on_first_tick() {
        let mut c = Countdown::new(0.0);
        assert!(!c.finished());
        assert!(c.tick(0.016));
        assert!(c.finished());
        assert!(!c.tick(0.016));
    }

    #[test]
    fn negative_countdown_behaves_as_zero() {
        let mut c = Countdown::new(-3.0);
        assert_eq!(c.remaining(), 0.0);
        assert!(c.tick(0.0));
    }
}
