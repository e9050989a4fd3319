//! Frame-driven timers
//!
//! The UI thread feeds elapsed frame time into these instead of spawning
//! background tasks, so a timer only ever fires while its owner is alive.

use std::time::Duration;

/// Repeating timer.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    /// Create a stopped timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Start (or restart) counting a full interval from now.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt` and return how many times the timer fired.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        if self.interval.is_zero() {
            return 1;
        }

        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// Single-shot delay.
#[derive(Debug, Clone)]
pub struct OneShotTimer {
    delay: Duration,
    remaining: Option<Duration>,
}

impl OneShotTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, remaining: None }
    }

    pub fn arm(&mut self) {
        self.remaining = Some(self.delay);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`; returns `true` exactly once, when the delay runs out.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(remaining) if remaining <= dt => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - dt);
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_per_elapsed_interval() {
        let mut timer = IntervalTimer::new(Duration::from_millis(100));
        assert_eq!(timer.advance(Duration::from_millis(500)), 0);

        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(50)), 0);
        assert_eq!(timer.advance(Duration::from_millis(60)), 1);
        assert_eq!(timer.advance(Duration::from_millis(250)), 2);

        timer.stop();
        assert_eq!(timer.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_restart_resets_elapsed() {
        let mut timer = IntervalTimer::new(Duration::from_millis(100));
        timer.start();
        timer.advance(Duration::from_millis(90));
        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(90)), 0);
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timer = OneShotTimer::new(Duration::from_millis(100));
        assert!(!timer.advance(Duration::from_millis(200)));

        timer.arm();
        assert!(!timer.advance(Duration::from_millis(40)));
        assert!(timer.advance(Duration::from_millis(60)));
        assert!(!timer.advance(Duration::from_millis(60)));
        assert!(!timer.is_armed());
    }
}
