//! Host stand-ins for the watchdog and scheduler primitives.

use std::thread;
use std::time::Duration;

use adc_capture_core::traits::platform::{Scheduler, Watchdog};

/// There is no task watchdog on a desktop host; this only counts feeds.
#[derive(Debug, Default)]
pub struct HostWatchdog {
    feeds: u64,
}

impl HostWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}

impl Watchdog for HostWatchdog {
    fn reset(&mut self) {
        self.feeds += 1;
        log::trace!("watchdog fed ({})", self.feeds);
    }
}

/// Yields by sleeping the calling thread.
#[derive(Debug, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn sleep(&mut self, duration: Duration) {
        if duration.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn watchdog_counts_feeds() {
        let mut wd = HostWatchdog::new();
        wd.reset();
        wd.reset();
        assert_eq!(wd.feeds(), 2);
    }

    #[test]
    fn scheduler_sleeps_at_least_the_duration() {
        let start = Instant::now();
        ThreadScheduler.sleep(Duration::from_millis(2));
        assert!(start.elapsed() >= Duration::from_millis(2));
    }
}
