//! GeneratorConfig builder for constructing configuration

use super::GeneratorConfig;
use crate::epoch::Epoch;
use crate::error::{Error, Field, Result};
use crate::layout::Layout;

/// Default configuration values
pub(super) const DEFAULT_PROCESS_ID: u16 = 0;
pub(super) const DEFAULT_WORKER_ID: u16 = 0;
pub(super) const DEFAULT_SEQUENCE_STEP: u16 = 1;
pub(super) const DEFAULT_SPIN_ENABLED: bool = true;
pub(super) const DEFAULT_SPIN_LOOPS: u32 = 64;
pub(super) const DEFAULT_SPIN_YIELD_EVERY: u32 = 16;

/// Builder for GeneratorConfig
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    pub(super) epoch: Epoch,
    pub(super) process_id: u16,
    pub(super) worker_id: u16,
    pub(super) layout: Layout,
    pub(super) sequence_step: u16,
    pub(super) spin_enabled: bool,
    pub(super) spin_loops: u32,
    pub(super) spin_yield_every: u32,
}

impl GeneratorConfigBuilder {
    /// Create a new GeneratorConfigBuilder with default values
    pub const fn new() -> Self {
        Self {
            epoch: Epoch::EKO,
            process_id: DEFAULT_PROCESS_ID,
            worker_id: DEFAULT_WORKER_ID,
            layout: Layout::CANONICAL,
            sequence_step: DEFAULT_SEQUENCE_STEP,
            spin_enabled: DEFAULT_SPIN_ENABLED,
            spin_loops: DEFAULT_SPIN_LOOPS,
            spin_yield_every: DEFAULT_SPIN_YIELD_EVERY,
        }
    }

    /// Set the epoch all timestamps are measured from
    pub const fn epoch(mut self, epoch: Epoch) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set the process id, validated against the layout on build
    pub const fn process_id(mut self, process_id: u16) -> Self {
        self.process_id = process_id;
        self
    }

    /// Set the worker id, validated against the layout on build
    pub const fn worker_id(mut self, worker_id: u16) -> Self {
        self.worker_id = worker_id;
        self
    }

    /// Use a non-canonical bit layout
    pub const fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable micro spin before sleep on sequence exhaustion
    /// Amount the sequence grows by between IDs of the same millisecond
    ///
    /// Must be between 1 and the layout's maximum sequence. A larger step
    /// leaves gaps in the sequence and exhausts a millisecond sooner.
    pub const fn sequence_step(mut self, step: u16) -> Self {
        self.sequence_step = step;
        self
    }

    pub const fn enable_spin(mut self, enable: bool) -> Self {
        self.spin_enabled = enable;
        self
    }

    /// Set number of spin loops attempted before falling back to sleep
    pub const fn spin_loops(mut self, loops: u32) -> Self {
        self.spin_loops = loops;
        self
    }

    /// Set spin yield cadence. Yield every N spin iterations; 0 disables yielding
    pub const fn spin_yield_every(mut self, n: u32) -> Self {
        self.spin_yield_every = n;
        self
    }

    /// Validate and build the final GeneratorConfig
    pub fn build(self) -> Result<GeneratorConfig> {
        self.epoch.validate()?;
        check_node_id(Field::Process, self.process_id, self.layout.max_process_id())?;
        check_node_id(Field::Worker, self.worker_id, self.layout.max_worker_id())?;
        let max_step = self.layout.max_sequence();
        if self.sequence_step == 0 || self.sequence_step > max_step {
            return Err(Error::OutOfRange {
                field: Field::SequenceStep,
                value: self.sequence_step.into(),
                max: max_step.into(),
            });
        }
        Ok(GeneratorConfig::from_builder(self))
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_node_id(field: Field, value: u16, max: u16) -> Result<()> {
    if value > max {
        return Err(Error::OutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        });
    }
    Ok(())
}
