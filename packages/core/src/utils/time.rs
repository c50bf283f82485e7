//! Clock abstraction and relative-time labels for suggestion entries.
//!
//! # Examples
//!
//! ```rust
//! use smartlink_core::utils::{format_relative, Clock, FixedClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let clock = FixedClock::new(now);
//! assert_eq!(format_relative(now - Duration::minutes(5), clock.now()), "5 minutes ago");
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Source of "now" for anything that renders time relative to the present.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to an explicit instant; used by tests and scripted replays.
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut guard = self
            .instant
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .instant
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Human label for how long ago `then` was, as seen from `now`.
///
/// Timestamps in the future are treated as "just now".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return plural(elapsed.num_minutes(), "minute");
    }
    if elapsed < Duration::days(1) {
        return plural(elapsed.num_hours(), "hour");
    }
    if elapsed < Duration::days(30) {
        return plural(elapsed.num_days(), "day");
    }
    then.format("%Y-%m-%d").to_string()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(format_relative(noon() - Duration::seconds(20), noon()), "just now");
        assert_eq!(format_relative(noon() + Duration::hours(2), noon()), "just now");
    }

    #[test]
    fn test_minutes_hours_days() {
        assert_eq!(format_relative(noon() - Duration::minutes(1), noon()), "1 minute ago");
        assert_eq!(format_relative(noon() - Duration::minutes(42), noon()), "42 minutes ago");
        assert_eq!(format_relative(noon() - Duration::hours(3), noon()), "3 hours ago");
        assert_eq!(format_relative(noon() - Duration::days(1), noon()), "1 day ago");
        assert_eq!(format_relative(noon() - Duration::days(29), noon()), "29 days ago");
    }

    #[test]
    fn test_old_timestamps_show_date() {
        assert_eq!(format_relative(noon() - Duration::days(45), noon()), "2024-03-17");
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(noon());
        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), noon() + Duration::hours(1));
    }
}
