use super::models::{RawCourseRow, ScheduleEvent};

/// Keyword the timetable site prefixes room numbers with
const ROOM_KEYWORD: &str = "Salle";

/// City name that shows up hyphen-joined inside some venue strings
const CITY_HINT: &str = "CHALON SUR SAONE";

/// Split the free-text venue field into (general_location, room).
///
/// This is heuristic parsing tied to the source site's formatting, e.g.
/// `"CHALON SUR SAONE - Salle B204"`. Missing patterns fall back to
/// `"N/A"` for the room and the whole trimmed input for the location;
/// the function never fails.
pub fn parse_location(raw: &str) -> (String, String) {
    let keyword_at = find_room_keyword(raw);

    let room = keyword_at
        .and_then(|idx| capture_room(&raw[idx + ROOM_KEYWORD.len()..]))
        .unwrap_or_else(|| "N/A".to_string());

    let mut general = keyword_at
        .and_then(|idx| capture_general(&raw[..idx]))
        .unwrap_or_else(|| raw.trim().to_string());

    // The fallback path can still carry the keyword; cut it off there.
    if let Some(pos) = general.find(ROOM_KEYWORD) {
        general = general[..pos].trim_end().to_string();
    }
    if general.contains('-') && general.contains(CITY_HINT) {
        general = general
            .split('-')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
    }

    (general, room)
}

/// Find the first room keyword that is followed by whitespace
fn find_room_keyword(raw: &str) -> Option<usize> {
    raw.match_indices(ROOM_KEYWORD)
        .find(|(idx, _)| {
            raw[idx + ROOM_KEYWORD.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_whitespace())
        })
        .map(|(idx, _)| idx)
}

/// Capture the alphanumeric/space/hyphen run following the keyword
fn capture_room(tail: &str) -> Option<String> {
    let run: String = tail
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    let run = run.trim();
    (!run.is_empty()).then(|| run.to_string())
}

/// Capture the hyphen-free run preceding a " - " separator right before
/// the keyword, e.g. the city name in "CITY - Salle B204"
fn capture_general(before: &str) -> Option<String> {
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() {
        // No whitespace between the separator and the keyword
        return None;
    }

    let head = trimmed.strip_suffix('-')?;
    let head_trimmed = head.trim_end();
    if head_trimmed.len() == head.len() {
        // No whitespace between the venue text and the separator
        return None;
    }

    let start = head_trimmed.rfind('-').map(|p| p + 1).unwrap_or(0);
    let capture = head_trimmed[start..].trim();
    (!capture.is_empty()).then(|| capture.to_string())
}

/// Convert one scraper row into a schedule event, splitting the combined
/// venue field on the way
pub fn event_from_row(row: RawCourseRow) -> ScheduleEvent {
    let (location, room) = parse_location(&row.location);

    ScheduleEvent {
        title: row.title,
        start_date: row.start_date,
        start_time: row.start_time,
        end_date: row.end_date,
        end_time: row.end_time,
        professor: row.professor,
        location,
        room,
        description: row.description,
    }
}

/// Convert a full scrape into the new event collection
pub fn events_from_rows(rows: Vec<RawCourseRow>) -> Vec<ScheduleEvent> {
    rows.into_iter().map(event_from_row).collect()
}
