/// Utility functions
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.parse::<f64>().ok();
    }
    None
}

/// Split a composite `"YYYY-MM-DD | HH:MM"` stamp into date and time parts.
/// Without a separator the whole trimmed string is the date part.
pub fn split_date_time(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('|') {
        Some((date, time)) => {
            let time = time.trim();
            (date.trim(), (!time.is_empty()).then_some(time))
        }
        None => (raw.trim(), None),
    }
}

/// Calendar date of a launch stamp. The date part may carry trailing text
/// ("2024-01-15 10:30"), so only its first whitespace token is parsed.
pub fn parse_launch_date(raw: &str) -> Option<NaiveDate> {
    let (date, _) = split_date_time(raw);
    let token = date.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

/// Calendar year of a launch stamp.
pub fn launch_year(raw: &str) -> Option<i32> {
    parse_launch_date(raw).map(|date| date.year())
}
