//! Async Snowflake generation on the Tokio runtime
//!
//! Mirrors [`SnowflakeGenerator`](crate::SnowflakeGenerator) but waits with
//! [`tokio::time::sleep`] while holding a [`tokio::sync::Mutex`], so a clock
//! regression or an exhausted sequence never blocks a runtime thread.

use std::fmt;
use std::time::Duration;

use futures::stream::{self, Stream};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::GeneratorConfig;
use crate::epoch::Epoch;
use crate::error::{Error, Result};
use crate::generator::shared::{Core, Step};
use crate::generator::state::{SequenceState, Wait};
use crate::generator::wait::EXHAUSTED_SLEEP_MS;
use crate::layout::Layout;
use crate::snowflake::Snowflake;

/// Async counterpart of [`SnowflakeGenerator`](crate::SnowflakeGenerator)
///
/// The clock is only read, never slept on; waits go through Tokio's timer.
pub struct AsyncSnowflakeGenerator<C = SystemClock> {
    state: Mutex<SequenceState>,
    core: Core,
    clock: C,
}

impl AsyncSnowflakeGenerator<SystemClock> {
    /// Create an async generator on the system clock with the canonical layout
    pub fn new(epoch: Epoch, process_id: u16, worker_id: u16) -> Result<Self> {
        GeneratorConfig::new(epoch, process_id, worker_id).map(Self::with_config)
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> AsyncSnowflakeGenerator<C> {
    pub fn with_clock(config: GeneratorConfig, clock: C) -> Self {
        Self {
            state: Mutex::new(SequenceState::new()),
            core: Core::new(config),
            clock,
        }
    }

    /// Generate a new Snowflake
    ///
    /// Dropping the returned future before it completes releases the lock
    /// without consuming a sequence value.
    pub async fn generate(&self) -> Result<Snowflake> {
        self.core.ensure_open()?;
        let mut state = self.state.lock().await;
        loop {
            self.core.ensure_open()?;
            let now = self.clock.now_ms();
            match self.core.step(&mut *state, now)? {
                Step::Ready(id) => return Ok(id),
                Step::Wait(wait) => self.wait(wait, now).await,
            }
        }
    }

    /// Generate a new Snowflake, giving up with [`Error::Timeout`] after
    /// `timeout`
    pub async fn generate_timeout(&self, timeout: Duration) -> Result<Snowflake> {
        tokio::time::timeout(timeout, self.generate())
            .await
            .map_err(|_| Error::Timeout {
                waited_ms: timeout.as_millis() as u64,
            })?
    }

    /// Endless stream of IDs that ends once the generator is closed
    pub fn stream(&self) -> impl Stream<Item = Result<Snowflake>> + '_ {
        stream::unfold(self, |generator| async move {
            match generator.generate().await {
                Err(Error::Closed) => None,
                result => Some((result, generator)),
            }
        })
    }

    /// Close the generator; pending and later calls fail with
    /// [`Error::Closed`]
    pub fn close(&self) {
        self.core.close();
    }

    #[inline]
    pub fn decode(&self, id: Snowflake) -> u64 {
        id.timestamp_ms(&self.layout(), self.epoch())
    }

    async fn wait(&self, wait: Wait, now: u64) {
        match wait {
            Wait::ClockBehind { ms } => {
                warn!(
                    behind_ms = ms,
                    process_id = self.process_id(),
                    worker_id = self.worker_id(),
                    "clock moved backwards, waiting for it to catch up"
                );
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            Wait::SequenceExhausted => {
                debug!(timestamp = now, "sequence exhausted, waiting for next millisecond");
                tokio::time::sleep(Duration::from_millis(EXHAUSTED_SLEEP_MS)).await;
            }
        }
    }
}

impl<C> AsyncSnowflakeGenerator<C> {
    #[inline(always)]
    pub fn config(&self) -> &GeneratorConfig {
        self.core.config()
    }

    #[inline(always)]
    pub fn epoch(&self) -> Epoch {
        self.core.config().epoch()
    }

    #[inline(always)]
    pub fn process_id(&self) -> u16 {
        self.core.config().process_id()
    }

    #[inline(always)]
    pub fn worker_id(&self) -> u16 {
        self.core.config().worker_id()
    }

    #[inline(always)]
    pub fn layout(&self) -> Layout {
        self.core.config().layout()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Whether a caller currently holds the generator's lock
    pub fn is_busy(&self) -> bool {
        self.state.try_lock().is_err()
    }

    #[inline]
    pub fn generated(&self) -> u64 {
        self.core.generated()
    }
}

impl<C> fmt::Debug for AsyncSnowflakeGenerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSnowflakeGenerator")
            .field("epoch", &self.epoch())
            .field("process_id", &self.process_id())
            .field("worker_id", &self.worker_id())
            .field("generated", &self.generated())
            .field("closed", &self.is_closed())
            .finish()
    }
}
