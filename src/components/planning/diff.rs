use super::models::{ChangeSet, ScheduleEvent};
use std::collections::HashSet;

/// Compute the symmetric set difference between two snapshots.
///
/// Both inputs are treated as sets over full-tuple equality: ordering and
/// literal duplicates within one snapshot carry no meaning. An event with a
/// single changed field counts as one removal plus one addition; there is no
/// field-level matching. Output order follows the first occurrence in the
/// respective input, which keeps notifications stable across runs.
pub fn diff(old: &[ScheduleEvent], new: &[ScheduleEvent]) -> ChangeSet {
    let old_set: HashSet<&ScheduleEvent> = old.iter().collect();
    let new_set: HashSet<&ScheduleEvent> = new.iter().collect();

    let mut seen: HashSet<&ScheduleEvent> = HashSet::new();
    let added = new
        .iter()
        .filter(|e| !old_set.contains(e) && seen.insert(*e))
        .cloned()
        .collect();

    let mut seen: HashSet<&ScheduleEvent> = HashSet::new();
    let removed = old
        .iter()
        .filter(|e| !new_set.contains(e) && seen.insert(*e))
        .cloned()
        .collect();

    ChangeSet { added, removed }
}
