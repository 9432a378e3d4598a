//! Injected clock capability.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Source of the current time.
///
/// Injected into the [`Logger`](crate::Logger) so log output is
/// deterministic under test: swap the system clock for a fixed one and
/// every emitted line is byte-reproducible.
pub trait Clock: Send + Sync {
    /// The current moment, with offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The real system clock, reported in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// The smallest representable timestamp, `1/1/0001 12:00:00 AM +00:00`.
    pub fn minimum() -> Self {
        let utc = FixedOffset::east_opt(0).expect("zero offset is valid");
        Self(
            utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
                .single()
                .expect("year one is representable"),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::minimum();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_minimum_renders_like_the_runtime_minimum() {
        let now = FixedClock::minimum().now();
        assert_eq!(
            now.format("%-m/%-d/%Y %-I:%M:%S %p %:z").to_string(),
            "1/1/0001 12:00:00 AM +00:00"
        );
    }
}
