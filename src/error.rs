use std::fmt;

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A named field of the bit layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    Worker,
    Process,
    Sequence,
    SequenceStep,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Timestamp => "timestamp",
            Field::Worker => "worker id",
            Field::Process => "process id",
            Field::Sequence => "sequence",
            Field::SequenceStep => "sequence step",
        })
    }
}

/// Represents errors that can occur during Snowflake operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A node identity or sequence step does not fit its field
    #[error("{field} {value} is out of range. Maximum allowed value is {max}")]
    OutOfRange { field: Field, value: u64, max: u64 },

    /// Field widths that cannot be packed into a 64-bit ID
    #[error("Invalid bit layout: {reason}")]
    InvalidLayout { reason: &'static str },

    /// The clock reads earlier than the configured epoch
    #[error("Epoch {epoch_ms} is after the current time {now_ms}")]
    InvalidEpoch { epoch_ms: u64, now_ms: u64 },

    /// An epoch outside the range of signed Unix milliseconds since 1970
    #[error("Epoch {epoch_ms} is out of range")]
    EpochOutOfRange { epoch_ms: i128 },

    /// Text that is neither an RFC 3339 timestamp nor integer milliseconds
    #[error("{input:?} is not a valid epoch")]
    InvalidEpochFormat { input: String },

    /// A computed field cannot be packed, usually because the epoch is too old
    #[error("Cannot encode {field} {value}: exceeds the maximum of {max}")]
    EncodingOverflow { field: Field, value: u64, max: u64 },

    /// The generator was closed
    #[error("Generator is closed")]
    Closed,

    /// A caller-supplied deadline elapsed before an ID could be produced
    #[error("Timed out after {waited_ms} milliseconds waiting for an ID")]
    Timeout { waited_ms: u64 },

    /// A signed ID below zero was passed to the decoder
    #[error("ID {id} is negative")]
    NegativeId { id: i64 },

    /// Text that does not parse as an unsigned 64-bit ID
    #[error("{input:?} is not a valid ID")]
    InvalidId { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let out_of_range = Error::OutOfRange {
            field: Field::Worker,
            value: 32,
            max: 31,
        };
        assert_eq!(
            out_of_range.to_string(),
            "worker id 32 is out of range. Maximum allowed value is 31"
        );

        let overflow = Error::EncodingOverflow {
            field: Field::Timestamp,
            value: 1 << 41,
            max: (1 << 41) - 1,
        };
        assert_eq!(
            overflow.to_string(),
            "Cannot encode timestamp 2199023255552: exceeds the maximum of 2199023255551"
        );

        assert_eq!(Error::Closed.to_string(), "Generator is closed");
        assert_eq!(
            Error::Timeout { waited_ms: 50 }.to_string(),
            "Timed out after 50 milliseconds waiting for an ID"
        );
    }

    #[test]
    fn test_error_debug() {
        let err = Error::NegativeId { id: -1 };
        assert!(format!("{:?}", err).contains("NegativeId"));
    }

    #[test]
    fn test_error_clone() {
        let original = Error::InvalidId {
            input: "abc".to_string(),
        };
        let cloned = original.clone();
        assert_eq!(original, cloned);
        assert_eq!(cloned.to_string(), "\"abc\" is not a valid ID");
    }
}
