//! Timestamp recovery from generated IDs
//!
//! An ID carries no record of its epoch or layout, so decoding needs both.

use chrono::{DateTime, Utc};

use crate::epoch::Epoch;
use crate::error::Result;
use crate::layout::{self, Layout};
use crate::snowflake::Snowflake;

/// Recovers creation times from Snowflakes
///
/// Only the timestamp is recoverable. The same layout and epoch that produced
/// an ID must be supplied, since neither is stored in the ID.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Decoder {
    layout: Layout,
    epoch: Epoch,
}

impl Decoder {
    /// Create a decoder for IDs produced with `layout` and `epoch`
    pub const fn new(layout: Layout, epoch: Epoch) -> Self {
        Self { layout, epoch }
    }

    /// Decoder for the canonical layout
    pub const fn canonical(epoch: Epoch) -> Self {
        Self::new(Layout::CANONICAL, epoch)
    }

    #[inline(always)]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[inline(always)]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Absolute Unix milliseconds at which `id` was minted
    #[inline(always)]
    pub fn timestamp_ms(&self, id: Snowflake) -> u64 {
        id.timestamp_ms(&self.layout, self.epoch)
    }

    /// Milliseconds between the epoch and the minting of `id`
    #[inline(always)]
    pub const fn elapsed_ms(&self, id: Snowflake) -> u64 {
        self.layout.decode_timestamp(id.as_u64())
    }

    /// UTC date-time at which `id` was minted
    pub fn datetime(&self, id: Snowflake) -> Option<DateTime<Utc>> {
        id.to_datetime(&self.layout, self.epoch)
    }

    /// Decode a signed ID, as stored in a signed 64-bit column
    ///
    /// Fails with [`Error::NegativeId`](crate::Error::NegativeId) below zero.
    pub fn timestamp_ms_signed(&self, id: i64) -> Result<u64> {
        Snowflake::try_from(id).map(|id| self.timestamp_ms(id))
    }

    /// Decode an ID from its decimal text
    pub fn timestamp_ms_str(&self, id: &str) -> Result<u64> {
        id.parse::<Snowflake>().map(|id| self.timestamp_ms(id))
    }
}

/// Absolute Unix milliseconds of a canonical ID produced with `epoch`
///
/// Equivalent to `(id >> 22) + epoch`.
#[inline]
pub const fn decode(id: u64, epoch: Epoch) -> u64 {
    layout::decode(id, epoch.as_millis())
}

/// Like [`decode`] for a signed ID; fails for negative values
pub fn decode_signed(id: i64, epoch: Epoch) -> Result<u64> {
    Decoder::canonical(epoch).timestamp_ms_signed(id)
}
