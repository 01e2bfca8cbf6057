//! Clock sources for Snowflake generation
//!
//! A [`Clock`] reports wall-clock time in milliseconds since the Unix epoch
//! and performs the blocking waits a generator needs when its sequence is
//! exhausted or the clock moves backwards. Swapping the clock makes the
//! generator fully deterministic in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of Unix time in milliseconds
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds
    fn sleep_ms(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    #[inline]
    fn sleep_ms(&self, ms: u64) {
        (**self).sleep_ms(ms)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    #[inline]
    fn sleep_ms(&self, ms: u64) {
        (**self).sleep_ms(ms)
    }
}

/// The operating system wall clock
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// A system clock set before 1970 reads as 0, which the generator then
    /// reports as an invalid epoch instead of panicking.
    #[inline(always)]
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to
///
/// Sleeping on a `ManualClock` advances it by the requested amount instead of
/// blocking, so a generator waiting for the next millisecond returns
/// immediately with a predictable timestamp. Share it with a generator through
/// an [`Arc`] to keep control of the time from the test.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
    slept: AtomicU64,
    sleeps: AtomicU64,
}

impl ManualClock {
    /// Create a clock fixed at `now_ms`
    pub const fn new(now_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(now_ms),
            slept: AtomicU64::new(0),
            sleeps: AtomicU64::new(0),
        }
    }

    /// Set the current time, possibly backwards
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Move the clock forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Total milliseconds callers have slept on this clock
    pub fn slept_ms(&self) -> u64 {
        self.slept.load(Ordering::SeqCst)
    }

    /// Number of sleep calls made on this clock
    pub fn sleeps(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep_ms(&self, ms: u64) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.slept.fetch_add(ms, Ordering::SeqCst);
        self.advance(ms);
    }
}
