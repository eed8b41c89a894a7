use crate::period::PeriodWindow;
use crate::records::DatedRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

/// Parses a record date. Accepts plain dates, naive timestamps and RFC 3339.
///
/// Timestamps keep the calendar date as written; no timezone conversion happens,
/// so `2025-09-30T23:30:00-03:00` belongs to September 30th.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    // Postgres style offsets such as "2025-09-01 10:00:00+00"
    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.date_naive());
        }
    }

    None
}

/// Keeps the records whose date falls inside `window`.
///
/// Records without a parseable date are dropped silently.
pub fn filter_to_period<'a, T>(records: &'a [T], window: &PeriodWindow) -> Vec<&'a T>
where
    T: DatedRecord,
{
    let mut undated = 0usize;

    let kept: Vec<&T> = records
        .iter()
        .filter(|record| match record.date_field().and_then(parse_record_date) {
            Some(date) => window.contains(date),
            None => {
                undated += 1;
                false
            }
        })
        .collect();

    debug!(
        "{}: kept {} of {} records for {} ({} without a usable date)",
        T::SOURCE,
        kept.len(),
        records.len(),
        window.token(),
        undated
    );

    kept
}
