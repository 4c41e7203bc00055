//! Time source abstraction.
//!
//! Every channel in a network shares one clock by reference so elapsed time
//! is consistent system-wide. The capability is injectable:
//! - Production: [`SystemClock`] over `std::time::Instant`
//! - Simulation/tests: [`VirtualClock`], driven explicitly by the harness

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonically non-decreasing time source.
///
/// Readings are offsets from an arbitrary epoch (typically construction).
/// A regressing reading is a contract violation by the implementation;
/// consumers do not defend against it.
pub trait Clock: Send + Sync {
    /// Current offset from the clock's epoch.
    fn now(&self) -> Duration;

    /// Current offset in whole milliseconds, the transmission accounting
    /// granularity.
    fn now_millis(&self) -> u64 {
        self.now().as_millis() as u64
    }
}

/// Wall-clock time, measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Externally driven clock for deterministic simulation.
///
/// Starts at zero and only moves when the harness advances it, so a test can
/// place channel operations at exact instants.
#[derive(Debug, Default)]
pub struct VirtualClock {
    millis: AtomicU64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Move the clock forward by whole milliseconds.
    pub fn advance_millis(&self, by: u64) {
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_starts_at_zero() {
        let clock = VirtualClock::new();
        assert_eq!(clock.now_millis(), 0);
    }

    #[test]
    fn test_virtual_clock_advances() {
        let clock = VirtualClock::new();
        clock.advance_millis(250);
        clock.advance(Duration::from_millis(750));
        assert_eq!(clock.now_millis(), 1000);
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_system_clock_is_non_decreasing() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
