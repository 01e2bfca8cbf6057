//! Bit layout of a Snowflake
//!
//! Packs the elapsed milliseconds, worker id, process id and sequence into a
//! single `u64`. The most significant bit is always left clear so that every
//! ID also fits a signed 64-bit column.

use crate::error::{Error, Field, Result};

/// Sequence bits of the canonical layout
pub const SEQUENCE_BITS: u8 = 12;
/// Process id bits of the canonical layout
pub const PROCESS_BITS: u8 = 5;
/// Worker id bits of the canonical layout
pub const WORKER_BITS: u8 = 5;
/// Shift of the timestamp field in the canonical layout
pub const TIMESTAMP_SHIFT: u8 = SEQUENCE_BITS + PROCESS_BITS + WORKER_BITS;
/// Timestamp bits of the canonical layout (sign bit excluded)
pub const TIMESTAMP_BITS: u8 = USABLE_BITS - TIMESTAMP_SHIFT;

const USABLE_BITS: u8 = 63;
const MAX_FIELD_BITS: u8 = 16;
const MIN_TIMESTAMP_BITS: u8 = 32;

/// Which node field sits directly above the sequence
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOrder {
    /// `[timestamp][worker][process][sequence]`
    #[default]
    WorkerHigh,
    /// `[timestamp][process][worker][sequence]`
    ProcessHigh,
}

/// Field widths and shifts of a Snowflake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    sequence_bits: u8,
    process_bits: u8,
    worker_bits: u8,
    order: FieldOrder,
    process_shift: u8,
    worker_shift: u8,
    timestamp_shift: u8,
}

impl Layout {
    /// 12-bit sequence, process at bits [12,17), worker at bits [17,22)
    pub const CANONICAL: Layout = Layout::from_widths(
        SEQUENCE_BITS,
        PROCESS_BITS,
        WORKER_BITS,
        FieldOrder::WorkerHigh,
    );

    /// Create a layout with custom field widths
    ///
    /// Every field takes 1 to 16 bits and at least 32 bits must remain for the
    /// timestamp.
    pub fn new(
        sequence_bits: u8,
        process_bits: u8,
        worker_bits: u8,
        order: FieldOrder,
    ) -> Result<Self> {
        for bits in [sequence_bits, process_bits, worker_bits] {
            if !(1..=MAX_FIELD_BITS).contains(&bits) {
                return Err(Error::InvalidLayout {
                    reason: "every field must be between 1 and 16 bits wide",
                });
            }
        }
        let low_bits = sequence_bits + process_bits + worker_bits;
        if USABLE_BITS - low_bits < MIN_TIMESTAMP_BITS {
            return Err(Error::InvalidLayout {
                reason: "at least 32 bits must remain for the timestamp",
            });
        }
        Ok(Self::from_widths(
            sequence_bits,
            process_bits,
            worker_bits,
            order,
        ))
    }

    const fn from_widths(
        sequence_bits: u8,
        process_bits: u8,
        worker_bits: u8,
        order: FieldOrder,
    ) -> Self {
        let (process_shift, worker_shift) = match order {
            FieldOrder::WorkerHigh => (sequence_bits, sequence_bits + process_bits),
            FieldOrder::ProcessHigh => (sequence_bits + worker_bits, sequence_bits),
        };
        Self {
            sequence_bits,
            process_bits,
            worker_bits,
            order,
            process_shift,
            worker_shift,
            timestamp_shift: sequence_bits + process_bits + worker_bits,
        }
    }

    /// Calculate mask for given number of bits
    #[inline]
    const fn mask(bits: u8) -> u64 {
        (1u64 << bits) - 1
    }

    #[inline(always)]
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    #[inline(always)]
    pub const fn process_bits(&self) -> u8 {
        self.process_bits
    }

    #[inline(always)]
    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    #[inline(always)]
    pub const fn timestamp_bits(&self) -> u8 {
        USABLE_BITS - self.timestamp_shift
    }

    #[inline(always)]
    pub const fn order(&self) -> FieldOrder {
        self.order
    }

    #[inline(always)]
    pub const fn process_shift(&self) -> u8 {
        self.process_shift
    }

    #[inline(always)]
    pub const fn worker_shift(&self) -> u8 {
        self.worker_shift
    }

    #[inline(always)]
    pub const fn timestamp_shift(&self) -> u8 {
        self.timestamp_shift
    }

    #[inline(always)]
    pub const fn max_sequence(&self) -> u16 {
        Self::mask(self.sequence_bits) as u16
    }

    #[inline(always)]
    pub const fn max_process_id(&self) -> u16 {
        Self::mask(self.process_bits) as u16
    }

    #[inline(always)]
    pub const fn max_worker_id(&self) -> u16 {
        Self::mask(self.worker_bits) as u16
    }

    /// Largest number of milliseconds since the epoch this layout can hold
    #[inline(always)]
    pub const fn max_timestamp(&self) -> u64 {
        Self::mask(self.timestamp_bits())
    }

    /// Pack the four fields into an ID
    ///
    /// Fails with [`Error::EncodingOverflow`] if any value is wider than its
    /// field.
    pub fn encode(
        &self,
        delta_ms: u64,
        worker_id: u16,
        process_id: u16,
        sequence: u16,
    ) -> Result<u64> {
        check(Field::Timestamp, delta_ms, self.max_timestamp())?;
        check(Field::Worker, worker_id.into(), self.max_worker_id().into())?;
        check(Field::Process, process_id.into(), self.max_process_id().into())?;
        check(Field::Sequence, sequence.into(), self.max_sequence().into())?;
        Ok(self.node_prefix(worker_id, process_id) | self.pack(delta_ms, sequence))
    }

    /// Node bits of an ID, precomputed once per generator
    #[inline(always)]
    pub(crate) const fn node_prefix(&self, worker_id: u16, process_id: u16) -> u64 {
        ((worker_id as u64) << self.worker_shift) | ((process_id as u64) << self.process_shift)
    }

    #[inline(always)]
    pub(crate) const fn pack(&self, delta_ms: u64, sequence: u16) -> u64 {
        (delta_ms << self.timestamp_shift) | sequence as u64
    }

    /// Milliseconds since the epoch stored in `id`
    #[inline(always)]
    pub const fn decode_timestamp(&self, id: u64) -> u64 {
        id >> self.timestamp_shift
    }

    /// Split an ID into (timestamp, worker, process, sequence)
    #[cfg(test)]
    pub(crate) fn split(&self, id: u64) -> (u64, u16, u16, u16) {
        (
            self.decode_timestamp(id),
            ((id >> self.worker_shift) & Self::mask(self.worker_bits)) as u16,
            ((id >> self.process_shift) & Self::mask(self.process_bits)) as u16,
            (id & Self::mask(self.sequence_bits)) as u16,
        )
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::CANONICAL
    }
}

#[inline]
fn check(field: Field, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::EncodingOverflow { field, value, max });
    }
    Ok(())
}

/// Pack the fields with the canonical layout
pub fn encode(delta_ms: u64, worker_id: u16, process_id: u16, sequence: u16) -> Result<u64> {
    Layout::CANONICAL.encode(delta_ms, worker_id, process_id, sequence)
}

/// Absolute Unix milliseconds of a canonical ID produced with `epoch_ms`
#[inline]
pub const fn decode(id: u64, epoch_ms: u64) -> u64 {
    (id >> TIMESTAMP_SHIFT).saturating_add(epoch_ms)
}
