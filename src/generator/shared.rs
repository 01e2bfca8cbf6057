//! Generator state shared by the blocking and async front ends

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{debug, trace};

use super::state::{Advance, SequenceState, Wait};
use crate::config::GeneratorConfig;
use crate::error::{Error, Field, Result};
use crate::snowflake::Snowflake;

/// Result of one pass through the critical section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Ready(Snowflake),
    Wait(Wait),
}

/// Everything about a generator except its lock and clock
#[derive(Debug)]
pub(crate) struct Core {
    config: GeneratorConfig,
    node_prefix: u64,
    closed: AtomicBool,
    generated: AtomicU64,
}

impl Core {
    pub(crate) fn new(config: GeneratorConfig) -> Self {
        let layout = config.layout();
        Self {
            node_prefix: layout.node_prefix(config.worker_id(), config.process_id()),
            config,
            closed: AtomicBool::new(false),
            generated: AtomicU64::new(0),
        }
    }

    #[inline(always)]
    pub(crate) const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    #[inline(always)]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[inline(always)]
    pub(crate) fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Mark the generator closed, returning whether this call closed it
    pub(crate) fn close(&self) -> bool {
        let newly_closed = !self.closed.swap(true, Ordering::AcqRel);
        if newly_closed {
            debug!(
                process_id = self.config.process_id(),
                worker_id = self.config.worker_id(),
                generated = self.generated(),
                "snowflake generator closed"
            );
        }
        newly_closed
    }

    /// Try to mint an ID at Unix time `now`
    ///
    /// Must be called with the generator's lock held and `state` borrowed from
    /// behind it. A clock that fell behind the last minted timestamp is waited
    /// out even when it also dips below the epoch; only a reading below the
    /// epoch with nothing to wait for is an error. The state is committed last,
    /// so it is untouched on every error.
    pub(crate) fn step(&self, state: &mut SequenceState, now: u64) -> Result<Step> {
        let layout = self.config.layout();
        let (timestamp, sequence) =
            match state.next(now, layout.max_sequence(), self.config.sequence_step()) {
                Advance::Ready {
                    timestamp,
                    sequence,
                } => (timestamp, sequence),
                Advance::Wait(wait) => return Ok(Step::Wait(wait)),
            };

        let epoch = self.config.epoch().as_millis();
        let Some(delta) = timestamp.checked_sub(epoch) else {
            return Err(Error::InvalidEpoch {
                epoch_ms: epoch,
                now_ms: now,
            });
        };
        let max = layout.max_timestamp();
        if delta > max {
            return Err(Error::EncodingOverflow {
                field: Field::Timestamp,
                value: delta,
                max,
            });
        }

        state.commit(timestamp, sequence);
        let id = Snowflake::from_u64(self.node_prefix | layout.pack(delta, sequence));
        self.generated.fetch_add(1, Ordering::Relaxed);
        trace!(id = id.as_u64(), delta, sequence, "minted snowflake");
        Ok(Step::Ready(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::Epoch;

    fn core() -> Core {
        Core::new(GeneratorConfig::new(Epoch::from_millis(1_000), 3, 7).unwrap())
    }

    #[test]
    fn test_step_encodes_node_identity() {
        let core = core();
        let mut state = SequenceState::new();
        let step = core.step(&mut state, 1_005).unwrap();
        assert_eq!(
            step,
            Step::Ready(Snowflake::from_u64((5 << 22) | (7 << 17) | (3 << 12)))
        );
        assert_eq!(core.generated(), 1);
    }

    #[test]
    fn test_step_rejects_clock_before_epoch() {
        let core = core();
        let mut state = SequenceState::new();
        assert_eq!(
            core.step(&mut state, 999),
            Err(Error::InvalidEpoch {
                epoch_ms: 1_000,
                now_ms: 999
            })
        );
        assert_eq!(state, SequenceState::new());
    }

    #[test]
    fn test_step_overflow() {
        let core = core();
        let mut state = SequenceState::new();
        let too_late = 1_000 + (1u64 << 41);
        assert!(matches!(
            core.step(&mut state, too_late),
            Err(Error::EncodingOverflow {
                field: Field::Timestamp,
                ..
            })
        ));
        assert_eq!(core.generated(), 0);
        assert_eq!(state, SequenceState::new());
    }

    #[test]
    fn test_step_waits_out_regression_below_epoch() {
        let core = core();
        let mut state = SequenceState::new();
        core.step(&mut state, 1_002).unwrap();
        assert_eq!(
            core.step(&mut state, 999),
            Ok(Step::Wait(Wait::ClockBehind { ms: 3 }))
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let core = core();
        assert!(core.ensure_open().is_ok());
        assert!(core.close());
        assert!(!core.close());
        assert_eq!(core.ensure_open(), Err(Error::Closed));
    }
}
