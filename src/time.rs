//! Evaluation time.

use core::time::Duration;
use der::asn1::{GeneralizedTime, UtcTime};

/// Number of seconds in one day.
pub const ONE_DAY_IN_SECONDS: u64 = 24 * 60 * 60;

/// A point in time, in whole seconds since the UNIX epoch.
///
/// Every time an OCSP response or certificate carries is converted into this type, so
/// comparisons never have to deal with `UTCTime` vs `GeneralizedTime`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Time(u64);

impl Time {
    /// Create a time from seconds since the UNIX epoch.
    pub const fn from_unix_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create a time from a duration since the UNIX epoch, truncating sub-second precision.
    pub const fn from_unix_duration(duration: Duration) -> Self {
        Self(duration.as_secs())
    }

    /// Seconds since the UNIX epoch.
    pub const fn unix_secs(self) -> u64 {
        self.0
    }

    /// The current system time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(Self::from_unix_duration)
            .unwrap_or(Self(0))
    }

    /// This time shifted forward by `days`, saturating at the end of representable time.
    pub fn saturating_add_days(self, days: u16) -> Self {
        Self(self.0.saturating_add(u64::from(days) * ONE_DAY_IN_SECONDS))
    }

}

impl From<GeneralizedTime> for Time {
    fn from(time: GeneralizedTime) -> Self {
        Self::from_unix_duration(time.to_unix_duration())
    }
}

impl From<UtcTime> for Time {
    fn from(time: UtcTime) -> Self {
        Self::from_unix_duration(time.to_unix_duration())
    }
}

#[cfg(feature = "std")]
impl From<std::time::SystemTime> for Time {
    fn from(time: std::time::SystemTime) -> Self {
        time.duration_since(std::time::UNIX_EPOCH)
            .map(Self::from_unix_duration)
            .unwrap_or(Self(0))
    }
}
