use crate::error::{validation_error, BotResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Date format used throughout the timetable export
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Calculate the next daily posting time in the given timezone
pub fn next_daily_time(now: DateTime<Tz>, time_str: &str) -> Option<DateTime<Tz>> {
    let (hour, minute) = parse_time(time_str)?;
    let tz = now.timezone();

    let mut next_date = now.date_naive();
    loop {
        let naive = next_date.and_hms_opt(hour, minute, 0)?;
        // earliest() skips past nonexistent local times on DST transitions
        if let Some(next) = tz.from_local_datetime(&naive).earliest() {
            if next > now {
                return Some(next);
            }
        }
        next_date = next_date.succ_opt()?;
    }
}

/// Seconds to sleep until `next`, never negative
pub fn wait_seconds(now: DateTime<Tz>, next: DateTime<Tz>) -> u64 {
    next.signed_duration_since(now).num_seconds().max(0) as u64
}

/// Parse a user-facing DD/MM/YYYY date
pub fn parse_date(date_str: &str) -> BotResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map_err(|_| validation_error("Invalid date format. Please use DD/MM/YYYY."))
}

/// Render a date in the user-facing DD/MM/YYYY form
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday of the week containing `date`
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Parse an event's stored date field; stored values come from the scraper
/// and are expected to be DD/MM/YYYY
pub fn parse_event_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).ok()
}
