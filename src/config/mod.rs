//! Configuration for the Snowflake generator

mod builder;

pub use builder::GeneratorConfigBuilder;

use crate::epoch::Epoch;
use crate::error::Result;
use crate::layout::Layout;

/// Validated configuration of one generator
///
/// Only [`GeneratorConfigBuilder::build`] creates values of this type, so
/// every `GeneratorConfig` holds node ids that fit its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    epoch: Epoch,
    process_id: u16,
    worker_id: u16,
    layout: Layout,
    sequence_step: u16,
    spin_enabled: bool,
    spin_loops: u32,
    spin_yield_every: u32,
}

impl GeneratorConfig {
    /// Create config from builder
    pub(crate) fn from_builder(b: GeneratorConfigBuilder) -> Self {
        Self {
            epoch: b.epoch,
            process_id: b.process_id,
            worker_id: b.worker_id,
            layout: b.layout,
            sequence_step: b.sequence_step,
            spin_enabled: b.spin_enabled,
            spin_loops: b.spin_loops,
            spin_yield_every: b.spin_yield_every,
        }
    }

    /// Create a new configuration builder
    pub const fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Canonical layout with the given epoch and node identity
    pub fn new(epoch: Epoch, process_id: u16, worker_id: u16) -> Result<Self> {
        Self::builder()
            .epoch(epoch)
            .process_id(process_id)
            .worker_id(worker_id)
            .build()
    }

    #[inline(always)]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[inline(always)]
    pub const fn process_id(&self) -> u16 {
        self.process_id
    }

    #[inline(always)]
    pub const fn worker_id(&self) -> u16 {
        self.worker_id
    }

    #[inline(always)]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Sequence increment between IDs of the same millisecond
    #[inline(always)]
    pub const fn sequence_step(&self) -> u16 {
        self.sequence_step
    }

    #[inline(always)]
    pub const fn spin_enabled(&self) -> bool {
        self.spin_enabled
    }

    #[inline(always)]
    pub const fn spin_loops(&self) -> u32 {
        self.spin_loops
    }

    #[inline(always)]
    pub const fn spin_yield_every(&self) -> u32 {
        self.spin_yield_every
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_builder(GeneratorConfigBuilder::new())
    }
}
