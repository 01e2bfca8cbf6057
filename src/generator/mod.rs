//! Core Snowflake generator implementation
//!
//! Split into modules for testability:
//! - `state` - Last timestamp and sequence, advanced under the lock
//! - `shared` - Validation, encoding and lifecycle shared with the async generator
//! - `wait` - Spin strategy for sequence exhaustion
//! - `generate` - Blocking ID generation
//! - `iter` - Pull-based iterator over generated IDs

pub(crate) mod shared;
mod generate;
mod iter;
pub(crate) mod state;
pub(crate) mod wait;

use std::fmt;

use parking_lot::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::config::GeneratorConfig;
use crate::decoder::Decoder;
use crate::epoch::Epoch;
use crate::error::Result;
use crate::layout::Layout;
use crate::snowflake::Snowflake;

use self::shared::Core;
use self::state::SequenceState;

pub use iter::Iter;

/// Thread-safe Snowflake generator for one (epoch, process, worker) triple
///
/// All callers of one generator share a single lock around the sequence
/// state. Waiting for the clock happens with that lock held, so no caller
/// ever sees a half-updated state.
pub struct SnowflakeGenerator<C = SystemClock> {
    state: Mutex<SequenceState>,
    core: Core,
    clock: C,
}

impl SnowflakeGenerator<SystemClock> {
    /// Create a generator on the system clock with the canonical layout
    ///
    /// Fails with [`Error::OutOfRange`](crate::Error::OutOfRange) if either
    /// id is above 31.
    pub fn new(epoch: Epoch, process_id: u16, worker_id: u16) -> Result<Self> {
        GeneratorConfig::new(epoch, process_id, worker_id).map(Self::with_config)
    }

    /// Create a generator on the system clock from a validated configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Create a generator reading time from `clock`
    pub fn with_clock(config: GeneratorConfig, clock: C) -> Self {
        Self {
            state: Mutex::new(SequenceState::new()),
            core: Core::new(config),
            clock,
        }
    }

    /// Close the generator; every later `generate()` fails with
    /// [`Error::Closed`](crate::Error::Closed)
    ///
    /// Callers currently waiting inside `generate()` give up at their next
    /// wake-up. Closing twice has no further effect.
    pub fn close(&self) {
        self.core.close();
    }

    /// Absolute Unix milliseconds at which `id` was minted by this generator
    #[inline]
    pub fn decode(&self, id: Snowflake) -> u64 {
        id.timestamp_ms(&self.layout(), self.epoch())
    }

    /// Decoder bound to this generator's epoch and layout
    pub fn decoder(&self) -> Decoder {
        Decoder::new(self.layout(), self.epoch())
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> SequenceState {
        *self.state.lock()
    }
}

impl<C> SnowflakeGenerator<C> {
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

    /// Whether [`close`](Self::close) has been called
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Whether a caller currently holds the generator's lock
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.state.is_locked()
    }

    /// Number of IDs handed out so far
    #[inline]
    pub fn generated(&self) -> u64 {
        self.core.generated()
    }

    /// The clock this generator reads
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C> fmt::Debug for SnowflakeGenerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("epoch", &self.epoch())
            .field("process_id", &self.process_id())
            .field("worker_id", &self.worker_id())
            .field("generated", &self.generated())
            .field("closed", &self.is_closed())
            .finish()
    }
}
