use planbot::components::planning::diff::diff;
use planbot::components::planning::format::{format_events, split_message};
use planbot::components::planning::ics::build_calendar;
use planbot::components::planning::models::{ChangeSet, RawCourseRow, ScheduleEvent};
use planbot::components::planning::parser::{event_from_row, parse_location};
use planbot::components::planning::scraper::run_scrape;
use planbot::components::planning::{route_changes, Delivery};
use planbot::components::planning::time::{parse_date, week_monday};
use planbot::error::Error;
use chrono::NaiveDate;
use std::collections::HashSet;

fn event(title: &str, start_time: &str) -> ScheduleEvent {
    ScheduleEvent {
        title: title.to_string(),
        start_date: "01/09/2025".to_string(),
        start_time: start_time.to_string(),
        end_date: "01/09/2025".to_string(),
        end_time: "12:00:00".to_string(),
        professor: "M. Dupont".to_string(),
        location: "CHALON SUR SAONE".to_string(),
        room: "B204".to_string(),
        description: "Cours magistral".to_string(),
    }
}

// --- Change detector ---

#[test]
fn diff_of_identical_snapshots_is_empty() {
    let snapshot = vec![event("Maths", "09:00:00"), event("Anglais", "14:00:00")];
    let changes = diff(&snapshot, &snapshot);
    assert!(changes.is_empty());
}

#[test]
fn diff_is_symmetric() {
    let a = vec![event("Maths", "09:00:00"), event("Anglais", "14:00:00")];
    let b = vec![event("Anglais", "14:00:00"), event("Physique", "16:00:00")];

    let forward = diff(&a, &b);
    let backward = diff(&b, &a);

    let forward_added: HashSet<_> = forward.added.iter().collect();
    let backward_removed: HashSet<_> = backward.removed.iter().collect();
    assert_eq!(forward_added, backward_removed);

    let forward_removed: HashSet<_> = forward.removed.iter().collect();
    let backward_added: HashSet<_> = backward.added.iter().collect();
    assert_eq!(forward_removed, backward_added);
}

#[test]
fn diff_ignores_ordering_and_duplicates() {
    let a = vec![
        event("Maths", "09:00:00"),
        event("Anglais", "14:00:00"),
        event("Maths", "09:00:00"), // literal duplicate
    ];
    let b = vec![event("Anglais", "14:00:00"), event("Maths", "09:00:00")];

    let changes = diff(&a, &b);
    assert!(changes.is_empty());
}

#[test]
fn one_changed_field_is_a_removal_plus_addition() {
    let old = vec![event("Maths", "09:00:00")];
    let new = vec![event("Maths", "10:00:00")]; // time changed

    let changes = diff(&old, &new);
    assert_eq!(changes.added, new);
    assert_eq!(changes.removed, old);
}

// --- Notification routing ---

#[test]
fn added_only_changes_route_to_the_added_channel() {
    let changes = ChangeSet {
        added: vec![
            event("Maths", "09:00:00"),
            event("Anglais", "14:00:00"),
            event("Physique", "16:00:00"),
        ],
        removed: Vec::new(),
    };

    assert_eq!(route_changes(&changes), vec![Delivery::AddedCourses]);
}

#[test]
fn removed_only_changes_route_to_the_removed_channel() {
    let changes = ChangeSet {
        added: Vec::new(),
        removed: vec![event("Maths", "09:00:00")],
    };

    assert_eq!(route_changes(&changes), vec![Delivery::RemovedCourses]);
}

#[test]
fn empty_changes_become_a_single_status_line() {
    assert_eq!(route_changes(&ChangeSet::default()), vec![Delivery::NoChanges]);
}

#[test]
fn mixed_changes_route_to_both_channels() {
    let changes = ChangeSet {
        added: vec![event("Physique", "16:00:00")],
        removed: vec![event("Maths", "09:00:00")],
    };

    assert_eq!(
        route_changes(&changes),
        vec![Delivery::AddedCourses, Delivery::RemovedCourses]
    );
}

// --- Message chunking ---

#[test]
fn short_message_is_a_single_chunk() {
    let chunks = split_message("hello", 1900);
    assert_eq!(chunks, vec!["hello".to_string()]);
}

#[test]
fn chunks_respect_the_limit_and_paragraph_breaks() {
    let paragraph = "x".repeat(50);
    let message = (0..20)
        .map(|_| paragraph.clone())
        .collect::<Vec<_>>()
        .join("\n\n");

    let chunks = split_message(&message, 120);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.len() <= 120, "chunk too long: {}", chunk.len());
        // Splits land on paragraph boundaries, so no chunk starts mid-paragraph
        assert!(chunk.starts_with('x'));
    }
}

#[test]
fn oversized_paragraph_is_hard_split() {
    let message = "y".repeat(500);
    let chunks = split_message(&message, 120);
    for chunk in &chunks {
        assert!(chunk.len() <= 120);
    }
    assert_eq!(chunks.concat(), message);
}

#[test]
fn chunks_reassemble_to_the_original_content() {
    let message = format!(
        "header\n\n{}\n\n{}\n\ntrailer",
        "a".repeat(200),
        "b".repeat(200)
    );
    let chunks = split_message(&message, 150);

    // Boundary whitespace is trimmed when chunking; everything else survives
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(strip(&chunks.concat()), strip(&message));
}

#[test]
fn trailing_blank_lines_produce_no_empty_chunk() {
    // Rendered listings always end in "\n\n"; after a hard split the
    // remainder can be pure whitespace and must not become a chunk
    let message = format!("{}\n\n", "A".repeat(100));
    let chunks = split_message(&message, 50);

    assert!(chunks.iter().all(|c| !c.is_empty()));
    assert_eq!(chunks.concat(), "A".repeat(100));
}

#[test]
fn hard_split_never_breaks_a_utf8_char() {
    let message = "é".repeat(300); // 2 bytes per char
    let chunks = split_message(&message, 101); // odd limit forces a mid-char boundary
    for chunk in &chunks {
        assert!(chunk.len() <= 101);
    }
    assert_eq!(chunks.concat(), message);
}

// --- Location parser ---

#[test]
fn parses_city_and_room() {
    let (general, room) = parse_location("CHALON SUR SAONE - Salle B204");
    assert_eq!(general, "CHALON SUR SAONE");
    assert_eq!(room, "B204");
}

#[test]
fn missing_room_keyword_falls_back() {
    let (general, room) = parse_location("  Amphitheatre principal  ");
    assert_eq!(general, "Amphitheatre principal");
    assert_eq!(room, "N/A");
}

#[test]
fn keyword_without_separator_keeps_room_only() {
    let (general, room) = parse_location("Salle B204");
    assert_eq!(general, "");
    assert_eq!(room, "B204");
}

#[test]
fn room_run_stops_at_disallowed_chars() {
    let (general, room) = parse_location("CHALON SUR SAONE - Salle B204 (2e etage)");
    assert_eq!(general, "CHALON SUR SAONE");
    assert_eq!(room, "B204");
}

#[test]
fn raw_row_becomes_event_with_split_location() {
    let row = RawCourseRow {
        title: "Maths".to_string(),
        start_date: "01/09/2025".to_string(),
        start_time: "09:00:00".to_string(),
        end_date: "01/09/2025".to_string(),
        end_time: "12:00:00".to_string(),
        professor: "M. Dupont".to_string(),
        location: "CHALON SUR SAONE - Salle B204".to_string(),
        description: "CM".to_string(),
    };

    let event = event_from_row(row);
    assert_eq!(event.location, "CHALON SUR SAONE");
    assert_eq!(event.room, "B204");
    assert_eq!(event.title, "Maths");
}

// --- Formatting ---

#[test]
fn event_listing_contains_all_fields() {
    let listing = format_events(&[event("Maths", "09:00:00")], "**Planning:**\n");
    assert!(listing.starts_with("**Planning:**\n"));
    assert!(listing.contains("**Maths**"));
    assert!(listing.contains("Professor: M. Dupont"));
    assert!(listing.contains("Location: CHALON SUR SAONE, Room: B204"));
    assert!(listing.contains("Description: Cours magistral"));
}

// --- Time helpers ---

#[test]
fn date_parsing_validates_format() {
    assert!(parse_date("15/09/2025").is_ok());
    assert!(matches!(
        parse_date("2025-09-15"),
        Err(Error::Validation(_))
    ));
    assert!(matches!(parse_date("32/13/2025"), Err(Error::Validation(_))));
}

#[test]
fn week_monday_is_the_start_of_the_week() {
    // 2025-09-03 is a Wednesday
    let wednesday = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
    let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    assert_eq!(week_monday(wednesday), monday);
    assert_eq!(week_monday(monday), monday);
}

// --- Calendar export ---

#[test]
fn calendar_converts_local_timestamps_to_utc() {
    let tz: chrono_tz::Tz = "Europe/Paris".parse().unwrap();
    let calendar = build_calendar(&[event("Maths", "09:00:00")], tz);

    assert!(calendar.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(calendar.contains("SUMMARY:Maths"));
    // 09:00 Paris in September is 07:00 UTC
    assert!(calendar.contains("DTSTART:20250901T070000Z"));
    assert!(calendar.contains("DTEND:20250901T100000Z"));
    assert!(calendar.contains("LOCATION:CHALON SUR SAONE\\, B204"));
    assert!(calendar.contains("DESCRIPTION:Professor: M. Dupont\\nDescription: Cours magistral"));
    assert!(calendar.ends_with("END:VCALENDAR\r\n"));
}

#[test]
fn calendar_skips_unparseable_events() {
    let mut bad = event("Broken", "09:00:00");
    bad.start_date = "not-a-date".to_string();

    let tz: chrono_tz::Tz = "Europe/Paris".parse().unwrap();
    let calendar = build_calendar(&[bad, event("Maths", "09:00:00")], tz);

    assert!(!calendar.contains("SUMMARY:Broken"));
    assert!(calendar.contains("SUMMARY:Maths"));
}

// --- Scraper failure taxonomy ---

#[tokio::test]
async fn scraper_success_decodes_rows() {
    let rows = run_scrape("echo []", 10).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn missing_scraper_is_unavailable() {
    let err = run_scrape("definitely-not-a-real-command-xyz", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ScrapeUnavailable(_)));
}

#[tokio::test]
async fn failing_scraper_is_reported_distinctly() {
    let err = run_scrape("false", 10).await.unwrap_err();
    assert!(matches!(err, Error::ScrapeFailed(_)));
}

#[tokio::test]
async fn garbage_output_is_malformed() {
    let err = run_scrape("echo not-json", 10).await.unwrap_err();
    assert!(matches!(err, Error::MalformedOutput(_)));
}
