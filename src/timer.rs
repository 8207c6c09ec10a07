//! Monotonic wall-clock interval measurement.
use std::time::{Duration, Instant};

/// Converts a duration into fractional milliseconds. Monotonic in the
/// nanosecond count.
#[inline]
pub fn duration_ms(elapsed: Duration) -> f64 {
    nanos_ms(elapsed.as_nanos())
}

#[inline]
pub(crate) fn nanos_ms(nanos: u128) -> f64 {
    nanos as f64 / 1.0e6
}

/// A started interval. `Instant` is monotonic, so wall-clock adjustments never
/// produce negative or inflated samples.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    #[inline]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        // `Duration` subtraction borrows a second when the nanosecond part underflows.
        Instant::now().duration_since(self.start)
    }

    /// Milliseconds elapsed since [`Timer::start`].
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }

    /// Adds the elapsed interval into `acc` and returns it. Totals stay in
    /// integer nanoseconds, so they are exact.
    #[inline]
    pub fn stop_and_accumulate(self, acc: &mut Duration) -> Duration {
        let elapsed = self.elapsed();
        *acc += elapsed;
        elapsed
    }
}
