//! Cooldown between accepted operations.
//!
//! Time comes from a [`Clock`] so that hosts without `std::time::Instant`
//! (the browser) can supply their own, and tests can step time by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source. Only differences between readings matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// `Instant`-based clock measuring from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Rejects an operation that arrives less than `window` after the last
/// accepted one.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    window: Duration,
    last: Option<Duration>,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True when an operation at `now` would be accepted.
    pub fn is_open(&self, now: Duration) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.window,
        }
    }

    /// Mark an operation as accepted at `now`.
    pub fn record(&mut self, now: Duration) {
        self.last = Some(now);
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_opens_after_window() {
        let mut gate = DebounceGate::new(Duration::from_millis(400));
        assert!(gate.is_open(Duration::ZERO));

        gate.record(Duration::from_millis(1000));
        assert!(!gate.is_open(Duration::from_millis(1000)));
        assert!(!gate.is_open(Duration::from_millis(1399)));
        assert!(gate.is_open(Duration::from_millis(1400)));
    }

    #[test]
    fn test_zero_window_never_blocks() {
        let mut gate = DebounceGate::new(Duration::ZERO);
        gate.record(Duration::from_millis(5));
        assert!(gate.is_open(Duration::from_millis(5)));
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
