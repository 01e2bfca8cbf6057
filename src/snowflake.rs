//! The generated identifier

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::epoch::Epoch;
use crate::error::{Error, Result};
use crate::layout::Layout;

/// A 64-bit Snowflake ID
///
/// Ordering follows the numeric value, which is creation order for IDs from
/// the same generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Snowflake(u64);

impl Snowflake {
    #[inline(always)]
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The ID as a signed integer, for storage in signed 64-bit columns
    #[inline]
    pub const fn as_i64(&self) -> i64 {
        self.0 as i64
    }

    /// Big-endian bytes of the ID
    #[inline]
    pub const fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    /// Absolute Unix milliseconds at which the ID was minted
    ///
    /// `epoch` must be the epoch of the generator that produced this ID.
    #[inline]
    pub fn timestamp_ms(&self, layout: &Layout, epoch: Epoch) -> u64 {
        layout
            .decode_timestamp(self.0)
            .saturating_add(epoch.as_millis())
    }

    /// UTC date-time at which the ID was minted
    pub fn to_datetime(&self, layout: &Layout, epoch: Epoch) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.timestamp_ms(layout, epoch)).ok()?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }
}

impl From<Snowflake> for u64 {
    fn from(id: Snowflake) -> u64 {
        id.0
    }
}

impl From<u64> for Snowflake {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl TryFrom<i64> for Snowflake {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self> {
        u64::try_from(id)
            .map(Self)
            .map_err(|_| Error::NegativeId { id })
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Snowflake {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(signed) = trimmed.parse::<i64>() {
            return Self::try_from(signed);
        }
        trimmed.parse::<u64>().map(Self).map_err(|_| Error::InvalidId {
            input: s.to_string(),
        })
    }
}
