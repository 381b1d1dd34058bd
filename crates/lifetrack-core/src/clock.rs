//! Wall-clock helpers.
//!
//! Dates shown to users are local to a fixed UTC offset (Tbilisi, UTC+4,
//! by default; Georgia observes no DST).

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Default UTC offset in seconds (UTC+4).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 4 * 3600;

/// Current time as microseconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp_micros().max(0) as u64
}

/// Current time at the given UTC offset.
///
/// Offsets outside +/- 24h fall back to UTC.
pub fn now_at(offset_secs: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset)
}

/// Today's date at the given UTC offset.
pub fn today_at(offset_secs: i32) -> NaiveDate {
    now_at(offset_secs).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_applied() {
        let now = now_at(DEFAULT_UTC_OFFSET_SECS);
        assert_eq!(now.offset().local_minus_utc(), DEFAULT_UTC_OFFSET_SECS);
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let now = now_at(48 * 3600);
        assert_eq!(now.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_timestamp_monotonic_enough() {
        let a = current_timestamp();
        let b = current_timestamp();
        assert!(b >= a);
    }
}
