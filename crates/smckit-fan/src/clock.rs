use std::time::{Duration, Instant};

/// A monotonic time source plus the ability to block.
///
/// The unlock retry loop takes its timing through this trait so tests can
/// simulate elapsed time deterministically instead of sleeping for real.
pub trait Clock {
    /// The current monotonic instant.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The process clock: `Instant::now` and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
