//! Reference points in time for the timestamp field

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// An absolute point in time, in milliseconds since the Unix epoch
///
/// Every timestamp stored in a Snowflake is relative to the epoch of the
/// generator that produced it. The ID itself does not record which epoch was
/// used, so the same epoch must be supplied again to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    /// 2019-04-15T04:12:00Z, the default epoch
    pub const EKO: Epoch = Epoch(1_555_301_520_000);

    /// 1970-01-01T00:00:00Z
    pub const UNIX: Epoch = Epoch(0);

    /// 2010-11-04T01:42:54.657Z
    pub const TWITTER: Epoch = Epoch(1_288_834_974_657);

    /// 2015-01-01T00:00:00Z
    pub const DISCORD: Epoch = Epoch(1_420_070_400_000);

    /// Largest epoch accepted, chosen so it converts losslessly to `i64`
    pub const MAX: Epoch = Epoch(i64::MAX as u64);

    /// Create an epoch from milliseconds since the Unix epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create an epoch from a UTC date-time
    ///
    /// Fails for instants before the Unix epoch.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Result<Self> {
        let millis = datetime.timestamp_millis();
        u64::try_from(millis).map(Self).map_err(|_| Error::EpochOutOfRange {
            epoch_ms: millis.into(),
        })
    }

    #[inline(always)]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// The epoch as a UTC date-time
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(i64::try_from(self.0).ok()?)
    }

    /// Reject epochs that cannot be represented as signed milliseconds
    pub(crate) fn validate(self) -> Result<Self> {
        if self > Self::MAX {
            return Err(Error::EpochOutOfRange {
                epoch_ms: self.0.into(),
            });
        }
        Ok(self)
    }
}

impl Default for Epoch {
    fn default() -> Self {
        Self::EKO
    }
}

impl TryFrom<DateTime<Utc>> for Epoch {
    type Error = Error;

    fn try_from(datetime: DateTime<Utc>) -> Result<Self> {
        Self::from_datetime(datetime).and_then(Self::validate)
    }
}

impl FromStr for Epoch {
    type Err = Error;

    /// Parse an RFC 3339 timestamp or integer milliseconds
    ///
    /// Commas are accepted as digit separators in the integer form, so
    /// `"1,555,301,520,000"` parses the same as `"1555301520000"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            return Self::from_datetime(datetime.with_timezone(&Utc));
        }
        let digits: String = s.chars().filter(|c| *c != ',').collect();
        digits
            .parse::<u64>()
            .map_err(|_| Error::InvalidEpochFormat {
                input: s.to_string(),
            })
            .map(Self)
            .and_then(Self::validate)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_eko_epoch_date() {
        let expected = Utc.with_ymd_and_hms(2019, 4, 15, 4, 12, 0).unwrap();
        assert_eq!(Epoch::EKO.to_datetime(), Some(expected));
        assert_eq!(Epoch::from_datetime(expected).unwrap(), Epoch::EKO);
        assert_eq!(Epoch::default(), Epoch::EKO);
    }

    #[test]
    fn test_parse_epoch() {
        assert_eq!(
            "2019-04-15T04:12:00Z".parse::<Epoch>().unwrap(),
            Epoch::EKO
        );
        assert_eq!(
            "2019-04-15T06:12:00+02:00".parse::<Epoch>().unwrap(),
            Epoch::EKO
        );
        assert_eq!("1555301520000".parse::<Epoch>().unwrap(), Epoch::EKO);
        assert_eq!("1,555,301,520,000".parse::<Epoch>().unwrap(), Epoch::EKO);
        assert!("yesterday".parse::<Epoch>().is_err());
        assert!("-5".parse::<Epoch>().is_err());
    }

    #[test]
    fn test_pre_unix_epoch_rejected() {
        let before = Utc.with_ymd_and_hms(1969, 12, 31, 0, 0, 0).unwrap();
        assert!(matches!(
            Epoch::from_datetime(before),
            Err(Error::EpochOutOfRange { .. })
        ));
        assert!(matches!(
            Epoch::try_from(before),
            Err(Error::EpochOutOfRange { .. })
        ));

        let sixties = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert!(Epoch::try_from(sixties).is_err());
        assert_eq!(Epoch::try_from(Epoch::EKO.to_datetime().unwrap()), Ok(Epoch::EKO));
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Epoch::MAX.validate().is_ok());
        assert!(Epoch::from_millis(u64::MAX).validate().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Epoch::EKO.to_string(), "2019-04-15T04:12:00+00:00");
    }
}
