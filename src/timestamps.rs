use chrono::{Local, NaiveDateTime, TimeZone};
use serde_json::Value;

/// Layout of string timestamps in older exports, e.g. `Jan 5, 2023 14:30:00`.
pub const DATE_FORMAT: &str = "%b %d, %Y %H:%M:%S";

/// Resolve a raw `createTime`/`updateTime` value to epoch seconds.
///
/// Integers are epoch milliseconds. Strings are local wall-clock times in
/// [`DATE_FORMAT`]. Everything else, including strings that do not parse,
/// resolves to `fallback`.
pub fn resolve_epoch(value: Option<&Value>, fallback: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|ms| ms.div_euclid(1000))
            .unwrap_or(fallback),
        Some(Value::String(s)) => parse_local_date(s).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Parse a [`DATE_FORMAT`] string in the local time zone.
/// Ambiguous local times (DST fold) resolve to the earlier instant.
pub fn parse_local_date(s: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}
