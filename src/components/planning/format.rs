use super::models::{HomeworkItem, ScheduleEvent};

/// Discord's hard limit is 2000 characters; leave headroom for markdown
pub const MAX_MESSAGE_LEN: usize = 1900;

/// Render a full event listing (daily and lookup views)
pub fn format_events(events: &[ScheduleEvent], header: &str) -> String {
    let mut out = String::from(header);
    for event in events {
        out.push_str(&format!(
            "- **{}** ({} {} - {} {})\n",
            event.title, event.start_date, event.start_time, event.end_date, event.end_time
        ));
        out.push_str(&format!("  Professor: {}\n", event.professor));
        out.push_str(&format!(
            "  Location: {}, Room: {}\n",
            event.location, event.room
        ));
        out.push_str(&format!("  Description: {}\n\n", event.description));
    }
    out
}

/// Render the shorter add/remove announcement lines
pub fn format_change_lines(events: &[ScheduleEvent], header: &str) -> String {
    let mut out = String::from(header);
    for event in events {
        out.push_str(&format!(
            "- **{}** ({} {} - {} {})\n",
            event.title, event.start_date, event.start_time, event.end_date, event.end_time
        ));
        out.push_str(&format!(
            "  Professor: {}, Location: {}, Room: {}\n\n",
            event.professor, event.location, event.room
        ));
    }
    out
}

/// Render the homework listing
pub fn format_homework(items: &[HomeworkItem], header: &str) -> String {
    let mut out = String::from(header);
    for item in items {
        out.push_str(&format!(
            "- **{}** (Professor: {}, Due: {}): {}\n",
            item.course_name, item.professor_name, item.due_date, item.description
        ));
    }
    out
}

/// Split a message into chunks of at most `max_len` bytes.
///
/// Splits happen at the last paragraph break (`"\n\n"`) inside the window
/// when one exists. A paragraph longer than `max_len` has no break to use
/// and is hard-split at the window edge (rounded down to a char boundary)
/// rather than reflowed mid-word. The remainder is left-trimmed and
/// re-chunked, so delivery order matches document order. No chunk is ever
/// empty; a remainder consisting only of whitespace is dropped.
pub fn split_message(message: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "max_len must be positive");

    let mut chunks = Vec::new();
    let mut rest = message;

    while rest.len() > max_len {
        let mut cut = floor_char_boundary(rest, max_len);
        if cut == 0 {
            // max_len is narrower than the first char; emit it whole
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let window = &rest[..cut];
        let split_point = match window.rfind("\n\n") {
            Some(0) | None => window.len(),
            Some(pos) => pos,
        };

        chunks.push(rest[..split_point].to_string());
        rest = rest[split_point..].trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Largest char boundary at or below `idx`
fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
