//! Sleep primitive used between attempts.

use std::time::Duration;

/// Blocks the caller for a backoff interval.
///
/// Any `Fn(Duration)` closure is a `Sleeper`, so tests can pass `|_| {}`.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<F: Fn(Duration)> Sleeper for F {
    fn sleep(&self, duration: Duration) {
        self(duration)
    }
}
