use std::time::{SystemTime, UNIX_EPOCH};

/// A trait for time sources that return a wall-clock timestamp.
///
/// Only the legacy [`IssuancePolicy::Clock`](crate::IssuancePolicy::Clock)
/// consults the clock. Plugging in a fixed source makes those identifiers
/// deterministic in tests.
///
/// # Example
///
/// ```
/// use maternova_id::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_735_689_612_345
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis() % 100_000, 12_345);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// Reads [`SystemTime::now`] on every call.
///
/// A clock set before 1970 reads as zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}
