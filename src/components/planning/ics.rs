use super::models::ScheduleEvent;
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::warn;

/// Build an RFC 5545 calendar with one VEVENT per snapshot event.
///
/// Timestamps are interpreted in the timetable's timezone and emitted in
/// UTC. An event whose stored timestamps do not parse is skipped with a
/// warning instead of failing the whole export.
pub fn build_calendar(events: &[ScheduleEvent], tz: Tz) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//planbot//Planning//EN");

    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        let start = utc_stamp(&event.start_date, &event.start_time, tz);
        let end = utc_stamp(&event.end_date, &event.end_time, tz);

        let (Some(start), Some(end)) = (start, end) else {
            warn!(
                "Skipping event with unparseable timestamps: {} ({} {})",
                event.title, event.start_date, event.start_time
            );
            continue;
        };

        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{:x}@planbot", event_uid(event)));
        push_line(&mut out, &format!("DTSTAMP:{}", stamp));
        push_line(&mut out, &format!("DTSTART:{}", start));
        push_line(&mut out, &format!("DTEND:{}", end));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.title)));
        push_line(
            &mut out,
            &format!(
                "LOCATION:{}",
                escape_text(&format!("{}, {}", event.location, event.room))
            ),
        );
        push_line(
            &mut out,
            &format!(
                "DESCRIPTION:{}",
                escape_text(&format!(
                    "Professor: {}\nDescription: {}",
                    event.professor, event.description
                ))
            ),
        );
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Parse "DD/MM/YYYY HH:MM:SS" in the given timezone and render it in UTC
fn utc_stamp(date: &str, time: &str, tz: Tz) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%d/%m/%Y %H:%M:%S")
        .ok()?;
    let local = tz.from_local_datetime(&naive).earliest()?;
    Some(local.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string())
}

/// Deterministic UID derived from the event tuple
fn event_uid(event: &ScheduleEvent) -> u64 {
    let mut hasher = DefaultHasher::new();
    event.hash(&mut hasher);
    hasher.finish()
}

/// RFC 5545 TEXT escaping
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}
