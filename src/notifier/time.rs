use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Compute the target minute a notification pass matches against:
/// `now` shifted into the store's fixed-offset wall clock plus the lead
/// time, truncated to the minute and formatted as `YYYY-MM-DD HH:MM`.
pub fn target_time(now: DateTime<Utc>, utc_offset_hours: i64, lead_minutes: i64) -> String {
    let shifted = now + Duration::hours(utc_offset_hours) + Duration::minutes(lead_minutes);
    shifted.format("%Y-%m-%d %H:%M").to_string()
}

/// Render a store timestamp as a 24-hour Korean clock reading,
/// "09:05" becoming "09시 05분"
pub fn format_event_time(dt: &NaiveDateTime) -> String {
    dt.format("%H시 %M분").to_string()
}
