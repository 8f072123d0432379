//! `Date`: current time as text plus the `now`/`parse`/`UTC` helpers
//!
//! Expressions only ever need timestamps, so there are no date objects;
//! calling `Date()` yields the current local time as a string.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::value::{arg, NativeFn, Value};

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let date = NativeFn::new("Date", 7, |_, _| Ok(Value::string(format_local(Local::now()))))
        .with_static(
            "now",
            Value::native("now", 0, |_, _| {
                Ok(Value::Number(Utc::now().timestamp_millis() as f64))
            }),
        )
        .with_static(
            "parse",
            Value::native("parse", 1, |_, a| {
                Ok(Value::Number(parse_timestamp(&arg(a, 0).to_js_string())))
            }),
        )
        .with_static("UTC", Value::native("UTC", 7, date_utc));

    globals.insert("Date".to_string(), Value::function(date));
}

/// `Tue Oct 18 2026 10:00:00 GMT+0800`
fn format_local(now: DateTime<Local>) -> String {
    now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

/// Milliseconds since the epoch for the formats hosts commonly send:
/// RFC 3339, RFC 2822, `YYYY-MM-DD` (UTC midnight) and
/// `YYYY-MM-DD[T ]HH:MM[:SS]` (local time). Anything else is `NaN`.
pub(super) fn parse_timestamp(text: &str) -> f64 {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return dt.timestamp_millis() as f64;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt).timestamp_millis() as f64)
            .unwrap_or(f64::NAN);
    }

    let local_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in local_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp_millis() as f64)
                .unwrap_or(f64::NAN);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y/%m/%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| Local.from_local_datetime(&dt).earliest())
            .map(|dt| dt.timestamp_millis() as f64)
            .unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// `Date.UTC(year, monthIndex[, day, hours, minutes, seconds, ms])`
fn date_utc(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let field = |index: usize, default: f64| match arg(args, index) {
        Value::Undefined => default,
        other => other.to_number(),
    };
    let parts = [
        field(0, f64::NAN),
        field(1, 0.0),
        field(2, 1.0),
        field(3, 0.0),
        field(4, 0.0),
        field(5, 0.0),
        field(6, 0.0),
    ];
    if parts.iter().any(|p| !p.is_finite()) {
        return Ok(Value::Number(f64::NAN));
    }

    let [year, month, day, hours, minutes, seconds, millis] = parts.map(f64::trunc);
    // Month overflow rolls into the year, like the host does
    let year = year + (month / 12.0).floor();
    let month = month.rem_euclid(12.0);

    let timestamp = NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| {
            let base = dt.and_utc().timestamp_millis() as f64;
            base + (day - 1.0) * 86_400_000.0
                + hours * 3_600_000.0
                + minutes * 60_000.0
                + seconds * 1_000.0
                + millis
        })
        .unwrap_or(f64::NAN);
    Ok(Value::Number(timestamp))
}
