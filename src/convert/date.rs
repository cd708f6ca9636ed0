//! ISO 8601 date parsing
//!
//! Accepted forms, tried in this order:
//! 1. date-time with zone: `2014-03-20T15:30:42Z`, `2014-03-20T15:30:42+01:00`, `...+0100`, `...+01`
//! 2. local date-time: `2014-03-20T15:30:42`
//! 3. date only: `2014-03-20` (midnight local time)
//!
//! Fractional seconds are accepted in the first two forms.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Human readable list of accepted formats, used in error details
pub const ACCEPTED_FORMATS: &str =
    "expected yyyy-MM-ddTHH:mm:ss with zone, yyyy-MM-ddTHH:mm:ss or yyyy-MM-dd";

const ZONED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%#z";
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `raw` as an instant, interpreting zone-less input at `local`
pub fn parse_date_time(raw: &str, local: FixedOffset) -> Option<DateTime<Utc>> {
    parse_zoned(raw)
        .or_else(|| parse_local(raw, local))
        .or_else(|| parse_date(raw, local))
}

fn parse_zoned(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, ZONED_FORMAT))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_local(raw: &str, local: FixedOffset) -> Option<DateTime<Utc>> {
    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| at_offset(naive, local))
}

fn parse_date(raw: &str, local: FixedOffset) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    at_offset(date.and_hms_opt(0, 0, 0)?, local)
}

fn at_offset(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
