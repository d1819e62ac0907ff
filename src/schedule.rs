//! Recurrence projection and reminder firing.
//!
//! The session loop calls `tick` periodically; everything here mutates
//! state only through `TaskStore` operations, and the current instant is a
//! parameter, so ticks are replayable in tests at any wall-clock time.

use chrono::{Days, Months, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::interact::Interact;
use crate::model::task::{RecurrenceKind, TaskId};
use crate::store::TaskStore;

/// What one tick did
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Ids of tasks spawned by recurrence projection
    pub spawned: Vec<TaskId>,
    /// Ids of tasks whose reminder fired
    pub reminded: Vec<TaskId>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.reminded.is_empty()
    }
}

/// Run one scheduler pass: spawn due recurring occurrences and fire due
/// reminders.
///
/// Occurrences missed while no tick ran are skipped, not backfilled: the
/// projection advances `last_generated` to the most recent occurrence on or
/// before today and spawns exactly one instance per task, dated there.
pub fn tick(store: &mut TaskStore, now: NaiveDateTime, interact: &mut dyn Interact) -> TickReport {
    let today = now.date();
    let mut report = TickReport::default();

    let due: Vec<(TaskId, NaiveDate)> = store
        .tasks()
        .iter()
        .filter_map(|task| {
            let rec = task.recurring?;
            let occurrence = latest_due_occurrence(rec.kind, rec.last_generated, today)?;
            Some((task.id, occurrence))
        })
        .collect();

    for (id, date) in due {
        if let Some(spawned) = store.spawn_occurrence(id, date) {
            report.spawned.push(spawned);
        }
    }

    let fired: Vec<(TaskId, String)> = store
        .tasks()
        .iter()
        .filter(|task| !task.reminder_shown)
        .filter(|task| task.reminder.is_some_and(|at| at <= now))
        .map(|task| (task.id, task.text.clone()))
        .collect();

    for (id, text) in fired {
        interact.notify(&format!("Reminder: {} is due soon!", text));
        store.mark_reminder_shown(id);
        report.reminded.push(id);
    }

    if !report.is_empty() {
        debug!(
            spawned = report.spawned.len(),
            reminded = report.reminded.len(),
            "scheduler tick"
        );
    }
    report
}

/// The next occurrence after `from`, one interval out. `None` only on
/// calendar overflow.
pub fn next_occurrence(kind: RecurrenceKind, from: NaiveDate) -> Option<NaiveDate> {
    match kind {
        RecurrenceKind::Daily => from.checked_add_days(Days::new(1)),
        RecurrenceKind::Weekly => from.checked_add_days(Days::new(7)),
        RecurrenceKind::Monthly => from.checked_add_months(Months::new(1)),
        RecurrenceKind::Yearly => from.checked_add_months(Months::new(12)),
    }
}

/// The most recent occurrence after `from` that is on or before `today`,
/// or `None` when nothing is due yet.
fn latest_due_occurrence(
    kind: RecurrenceKind,
    from: NaiveDate,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let mut occurrence = next_occurrence(kind, from).filter(|next| *next <= today)?;
    while let Some(following) = next_occurrence(kind, occurrence) {
        if following > today {
            break;
        }
        occurrence = following;
    }
    Some(occurrence)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
