//! # Timing
//!
//! Wall-clock measurement of the pipeline phases. The clock is injected so
//! that time-based behaviour (phase durations, the execution-time limit) is
//! deterministic in tests.
//!
//! ```rust
//! use std::time::Duration;
//! use evostream::timing::{ManualClock, TimedResult};
//!
//! let clock = ManualClock::new();
//! let timed = TimedResult::of(&clock, || {
//!     clock.advance(Duration::from_millis(5));
//!     42
//! });
//!
//! assert_eq!(timed.result, 42);
//! assert_eq!(timed.duration, Duration::from_millis(5));
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of monotonic instants.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
}

/// The system's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

/// Measures the time between `start` and `stop`.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Option<Instant>,
    stop: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: None,
            stop: None,
        }
    }

    /// Creates a timer that is already running.
    pub fn started(clock: &dyn Clock) -> Self {
        let mut timer = Self::new();
        timer.start(clock);
        timer
    }

    pub fn start(&mut self, clock: &dyn Clock) {
        self.start = Some(clock.now());
        self.stop = None;
    }

    pub fn stop(&mut self, clock: &dyn Clock) -> Duration {
        self.stop = Some(clock.now());
        self.elapsed()
    }

    /// Returns the measured time; zero if the timer never ran.
    pub fn elapsed(&self) -> Duration {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// A value together with the time it took to compute it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedResult<T> {
    pub result: T,
    pub duration: Duration,
}

impl<T> TimedResult<T> {
    /// Runs `f`, measuring its duration with `clock`.
    pub fn of<F>(clock: &dyn Clock, f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        let mut timer = Timer::started(clock);
        let result = f();
        let duration = timer.stop(clock);
        Self { result, duration }
    }

    pub fn map<U, F>(self, f: F) -> TimedResult<U>
    where
        F: FnOnce(T) -> U,
    {
        TimedResult {
            result: f(self.result),
            duration: self.duration,
        }
    }
}

impl<T, E> TimedResult<Result<T, E>> {
    /// Moves the error out, keeping the duration with the success value.
    pub fn transpose(self) -> Result<TimedResult<T>, E> {
        let duration = self.duration;
        self.result.map(|result| TimedResult { result, duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_not_started() {
        assert_eq!(Timer::new().elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_timer_with_manual_clock() {
        let clock = ManualClock::new();
        let mut timer = Timer::started(&clock);
        clock.advance(Duration::from_secs(2));
        assert_eq!(timer.stop(&clock), Duration::from_secs(2));
        assert_eq!(timer.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn test_timed_result_transpose() {
        let clock = ManualClock::new();
        let ok: TimedResult<Result<i32, String>> = TimedResult::of(&clock, || {
            clock.advance(Duration::from_millis(3));
            Ok(1)
        });
        let ok = ok.transpose().unwrap();
        assert_eq!(ok.result, 1);
        assert_eq!(ok.duration, Duration::from_millis(3));

        let err: TimedResult<Result<i32, String>> =
            TimedResult::of(&clock, || Err("boom".to_string()));
        assert_eq!(err.transpose(), Err("boom".to_string()));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
