//! Time abstraction traits for platform-agnostic timing.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Creates duration from microseconds.
    ///
    /// The default rounds up to whole milliseconds, so only a zero request
    /// gives a zero duration. Override it when the platform duration has
    /// finer resolution. Implementations must not round a non-zero request
    /// down to zero: [`DeadlineTimers`](crate::DeadlineTimers) would then
    /// fire the same slot repeatedly within one service call.
    fn from_micros(micros: u64) -> Self {
        Self::from_millis(micros.div_ceil(1_000))
    }

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// Instants must be ordered so deadlines can be compared against `now`.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}
