use serde::{Deserialize, Serialize};

/// One timetable entry.
///
/// Events carry no identifier of their own: two events are the same course
/// occurrence exactly when every field matches. Dates are DD/MM/YYYY and
/// times HH:MM:SS, as exported by the timetable site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub professor: String,
    pub location: String,
    pub room: String,
    pub description: String,
}

/// A raw row as emitted by the external scraper, before the combined
/// venue field has been split into location and room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseRow {
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub professor: String,
    pub location: String,
    pub description: String,
}

/// The outcome of one diff cycle: events present only in the new snapshot
/// and events present only in the old one. The two lists are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<ScheduleEvent>,
    pub removed: Vec<ScheduleEvent>,
}

impl ChangeSet {
    /// True when the cycle detected no changes at all
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A user-submitted homework assignment. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkItem {
    pub course_name: String,
    pub due_date: String,
    pub description: String,
    pub professor_name: String,
}
