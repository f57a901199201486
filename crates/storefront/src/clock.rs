//! Time source abstraction for timestamped records.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Source of the current time for listing and purchase timestamps.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock with second resolution.
#[derive(Debug)]
pub struct FixedClock {
    unix_seconds: AtomicI64,
}

impl FixedClock {
    /// Create a clock frozen at `unix_seconds`.
    #[must_use]
    pub const fn new(unix_seconds: i64) -> Self {
        Self {
            unix_seconds: AtomicI64::new(unix_seconds),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, seconds: i64) {
        self.unix_seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Default for FixedClock {
    /// 2024-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(1_704_067_200)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let seconds = self.unix_seconds.load(Ordering::SeqCst);
        Utc.timestamp_opt(seconds, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::new(1000);
        assert_eq!(clock.now().timestamp(), 1000);

        clock.advance(60);
        assert_eq!(clock.now().timestamp(), 1060);
    }

    #[test]
    fn test_default_is_2024() {
        assert_eq!(FixedClock::default().now().timestamp(), 1_704_067_200);
    }
}
