/// Time source and the debounced idle timer.
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Fires once, `delay` after the most recent `schedule`.
///
/// Each `schedule` replaces the pending deadline.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` and disarms the timer if its deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let clock = ManualClock::new();
        let mut timer = IdleTimer::new(Duration::from_millis(1000));
        timer.schedule(clock.now());
        assert!(timer.is_pending());

        clock.advance(Duration::from_millis(999));
        assert!(!timer.fire_if_due(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(timer.fire_if_due(clock.now()));
        assert!(!timer.fire_if_due(clock.now()));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_pushes_deadline() {
        let clock = ManualClock::new();
        let mut timer = IdleTimer::new(Duration::from_millis(1000));
        timer.schedule(clock.now());

        clock.advance(Duration::from_millis(800));
        timer.schedule(clock.now());

        clock.advance(Duration::from_millis(800));
        assert!(!timer.fire_if_due(clock.now()));

        clock.advance(Duration::from_millis(200));
        assert!(timer.fire_if_due(clock.now()));
    }

    #[test]
    fn test_cancel() {
        let clock = ManualClock::new();
        let mut timer = IdleTimer::new(Duration::from_millis(10));
        timer.schedule(clock.now());
        timer.cancel();
        clock.advance(Duration::from_secs(1));
        assert!(!timer.fire_if_due(clock.now()));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();
        clock.advance(Duration::from_secs(3));
        assert_eq!(other.now() - start, Duration::from_secs(3));
    }
}
