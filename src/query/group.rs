use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::model::task::Task;
use crate::model::view::ViewState;

use super::filter::filter_tasks;

/// One bucket of the planned view: every displayed task sharing a date
#[derive(Debug)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    /// Human label relative to today (`Today`, `Tomorrow`, or weekday form)
    pub label: String,
    pub tasks: Vec<&'a Task>,
}

/// Bucket the filter engine's output by date, ascending. Tasks without a
/// date are excluded.
pub fn group_by_date<'a>(
    tasks: &'a [Task],
    view: &ViewState,
    today: NaiveDate,
) -> Vec<DateGroup<'a>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in filter_tasks(tasks, view, today) {
        if let Some(date) = task.date {
            buckets.entry(date).or_default().push(task);
        }
    }

    buckets
        .into_iter()
        .map(|(date, tasks)| DateGroup {
            date,
            label: date_label(date, today),
            tasks,
        })
        .collect()
}

/// `Today`, `Tomorrow`, or `"<Weekday>, <Month> <Day>"`
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if Some(date) == today.checked_add_days(Days::new(1)) {
        return "Tomorrow".to_string();
    }
    format!("{}, {} {}", date.format("%A"), date.format("%B"), date.day())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
