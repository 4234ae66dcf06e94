use chrono::{DateTime, Local, TimeDelta, TimeZone};
use std::fmt;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Format a notification timestamp (milliseconds since the Unix epoch)
/// relative to now, using the local calendar.
///
/// Absent or zero timestamps format as an empty string.
pub fn format_relative_time(timestamp_ms: Option<i64>) -> String {
    let Some(ms) = timestamp_ms.filter(|ms| *ms != 0) else {
        return String::new();
    };
    let Some(then) = Local.timestamp_millis_opt(ms).earliest() else {
        return String::new();
    };
    relative_time_between(&then, &Local::now())
}

/// Relative label for `then` as seen at `now`.
///
/// Calendar comparisons happen in the time zone of the arguments.
pub fn relative_time_between<Tz>(then: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let diff_ms = now.timestamp_millis() - then.timestamp_millis();

    if diff_ms < MINUTE_MS {
        return "Now".to_string();
    }

    if then.date_naive() == now.date_naive() {
        let hours = diff_ms / HOUR_MS;
        return if hours > 0 {
            format!("{}h", hours)
        } else {
            format!("{}m", diff_ms / MINUTE_MS)
        };
    }

    let days = diff_ms / DAY_MS;
    if days > 0 {
        return format!("{}d", days);
    }

    // Previous calendar day but less than 24h old
    let day_before = now.clone() - TimeDelta::milliseconds(DAY_MS);
    if then.date_naive() == day_before.date_naive() {
        return "Yesterday".to_string();
    }

    then.format("%B %d").to_string()
}
