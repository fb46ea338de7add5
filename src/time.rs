//! Time abstraction traits for platform-agnostic timing.
//!
//! The controller only ever asks "how long since the last toggle", so
//! instants are required to answer that across counter overflow. [`Millis`]
//! is a ready-made 32-bit millisecond instant for platforms exposing an
//! Arduino-style `millis()` counter.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialOrd {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a wrapping counter must use wrapping
    /// subtraction so that an earlier instant taken before the overflow
    /// still yields the true elapsed time.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Millisecond duration matching [`Millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    const ZERO: Self = MillisDuration(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    /// Values beyond `u32::MAX` are clamped.
    fn from_millis(millis: u64) -> Self {
        MillisDuration(u32::try_from(millis).unwrap_or(u32::MAX))
    }

    fn saturating_sub(self, other: Self) -> Self {
        MillisDuration(self.0.saturating_sub(other.0))
    }
}

/// Reading of a free-running 32-bit millisecond counter.
///
/// The counter wraps after roughly 49.7 days; [`TimeInstant::duration_since`]
/// stays correct across the wrap as long as the two readings are less than
/// one full counter period apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }
}

impl From<u32> for Millis {
    fn from(millis: u32) -> Self {
        Millis(millis)
    }
}
