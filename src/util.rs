use std::error::Error;

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a `--since` value: a relative span like "6m", "1y", "30d"
/// (counted back from `now`), or an absolute date.
///
/// Approximations: 1 month = 30 days, 1 year = 365 days.
pub fn parse_since(s: &str, now: i64) -> Result<i64, Box<dyn Error>> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty --since value".into());
    }
    if let Ok(ts) = parse_date(s) {
        return Ok(ts);
    }

    let unit_start = s.char_indices().last().map_or(0, |(i, _)| i);
    let (num_str, unit) = s.split_at(unit_start);
    let n: i64 = num_str
        .parse()
        .map_err(|_| format!("invalid --since value: {s:?} (expected e.g. 6m, 1y, 30d or a date)"))?;

    let seconds = match unit {
        "d" => n.checked_mul(86_400),
        "m" => n.checked_mul(30 * 86_400),
        "y" => n.checked_mul(365 * 86_400),
        _ => return Err(format!("unknown unit in --since: {s:?} (use d, m, or y)").into()),
    }
    .ok_or("--since value too large")?;

    Ok(now - seconds)
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Result<i64, Box<dyn Error>> {
    parse_date_at(s, 0, 0, 0)
}

/// Parse an upper bound. A bare `YYYY-MM-DD` covers the whole day, so
/// it means 23:59:59 UTC.
pub fn parse_until(s: &str) -> Result<i64, Box<dyn Error>> {
    parse_date_at(s, 23, 59, 59)
}

fn parse_date_at(s: &str, hour: u32, min: u32, sec: u32) -> Result<i64, Box<dyn Error>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {s:?} (expected YYYY-MM-DD or RFC 3339)"))?;
    let at = date.and_hms_opt(hour, min, sec).ok_or("invalid date")?;
    Ok(at.and_utc().timestamp())
}

/// Render unix seconds as RFC 3339 in UTC.
pub fn format_timestamp(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Round to 6 decimals so emitted documents are stable across platforms.
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
#[path = "util_test.rs"]
mod tests;
