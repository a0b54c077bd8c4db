//! Timestamp utilities

use chrono::{DateTime, Duration, Utc};

/// Default inactivity window before the directory is wiped
pub const DEFAULT_INACTIVITY_DAYS: i64 = 14;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a whole number of days to a chrono duration
///
/// Saturates at the representable range instead of panicking.
pub fn days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or_else(|| {
        if days < 0 {
            Duration::min_value()
        } else {
            Duration::max_value()
        }
    })
}

/// True when `days` fits in a chrono duration
pub fn days_in_range(days: i64) -> bool {
    Duration::try_days(days).is_some()
}

/// True when strictly more than `threshold` has passed between `since` and `now`
///
/// A clock that moved backwards never counts as inactive.
pub fn exceeds(since: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    now.signed_duration_since(since) > threshold
}
