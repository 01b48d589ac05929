//! Shared helpers for calendar dates and clock times.
//!
//! Timestamps are stored in UTC; "which day" questions are answered in the
//! user's local timezone.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Calendar date of a timestamp in the local timezone.
pub fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Midday of a local date as a UTC instant.
///
/// Midday is never skipped by a DST transition, so this always exists.
pub fn local_noon(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// First instant of a local date as UTC. Falls back to UTC midnight when
/// local midnight does not exist.
pub fn local_start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// `count` consecutive dates starting at `start`.
pub fn days_from(start: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..count as i64).map(move |i| start + Duration::days(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_noon_round_trips_to_same_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap();
        assert_eq!(local_date(local_noon(date)), date);
    }

    #[test]
    fn days_from_spans_month_end() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
        let days: Vec<_> = days_from(start, 3).collect();
        assert_eq!(days.last(), NaiveDate::from_ymd_opt(2026, 2, 1).as_ref());
    }
}
