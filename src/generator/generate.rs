//! ID generation logic
//!
//! Blocking generate() with an optional caller deadline

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::shared::Step;
use super::state::{SequenceState, Wait};
use super::wait::{spin_wait, EXHAUSTED_SLEEP_MS};
use super::SnowflakeGenerator;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::snowflake::Snowflake;

/// Point in time after which a caller stops waiting
#[derive(Debug, Clone, Copy)]
struct Deadline {
    start: Instant,
    at: Instant,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        let start = Instant::now();
        let at = start
            .checked_add(timeout)
            .unwrap_or_else(|| start + Duration::from_secs(u32::MAX.into()));
        Self { start, at }
    }

    fn expired(&self) -> Error {
        Error::Timeout {
            waited_ms: self.start.elapsed().as_millis() as u64,
        }
    }

    /// Whether a wait of `ms` would finish before the deadline
    fn allows(&self, ms: u64) -> bool {
        Instant::now()
            .checked_add(Duration::from_millis(ms))
            .is_some_and(|done| done <= self.at)
    }
}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Generate a new Snowflake
    ///
    /// Blocks while the clock is behind the last minted timestamp or the
    /// sequence of the current millisecond is exhausted. Fails immediately
    /// with [`Error::Closed`] after [`close`](Self::close).
    #[inline]
    pub fn generate(&self) -> Result<Snowflake> {
        self.core.ensure_open()?;
        let mut state = self.state.lock();
        self.generate_locked(&mut *state, None)
    }

    /// Generate a new Snowflake, giving up after `timeout`
    ///
    /// Fails with [`Error::Timeout`] if the lock cannot be taken, or a
    /// required wait cannot complete, within `timeout`. The sequence state is
    /// left untouched on timeout.
    pub fn generate_timeout(&self, timeout: Duration) -> Result<Snowflake> {
        self.core.ensure_open()?;
        let deadline = Deadline::after(timeout);
        let mut state = self
            .state
            .try_lock_until(deadline.at)
            .ok_or_else(|| deadline.expired())?;
        self.generate_locked(&mut *state, Some(deadline))
    }

    fn generate_locked(
        &self,
        state: &mut SequenceState,
        deadline: Option<Deadline>,
    ) -> Result<Snowflake> {
        loop {
            self.core.ensure_open()?;
            let now = self.clock.now_ms();
            match self.core.step(state, now)? {
                Step::Ready(id) => return Ok(id),
                Step::Wait(wait) => {
                    if let Some(deadline) = deadline {
                        if !deadline.allows(wait.millis()) {
                            return Err(deadline.expired());
                        }
                    }
                    self.wait(wait, now);
                }
            }
        }
    }

    /// Block until a retry can succeed; the caller re-reads the clock after
    #[cold]
    #[inline(never)]
    fn wait(&self, wait: Wait, now: u64) {
        match wait {
            Wait::ClockBehind { ms } => {
                warn!(
                    behind_ms = ms,
                    process_id = self.process_id(),
                    worker_id = self.worker_id(),
                    "clock moved backwards, waiting for it to catch up"
                );
                self.clock.sleep_ms(ms);
            }
            Wait::SequenceExhausted => {
                debug!(timestamp = now, "sequence exhausted, waiting for next millisecond");
                if spin_wait(now, self.config(), || self.clock.now_ms()).is_none() {
                    self.clock.sleep_ms(EXHAUSTED_SLEEP_MS);
                }
            }
        }
    }
}
