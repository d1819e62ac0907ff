use std::cmp::Reverse;

use chrono::{Days, NaiveDate};

use crate::model::task::Task;
use crate::model::view::{Scope, SearchFilters, ViewState};

/// How far `Planned` looks ahead, in days (inclusive)
pub const PLANNED_WINDOW_DAYS: u64 = 30;

/// Derive the ordered task sequence for the current view.
///
/// With active search text, tasks are matched by case-insensitive substring
/// and then intersected with each populated structured filter. Otherwise
/// exactly one scope rule applies. Either way the result is sorted by
/// priority descending; the sort is stable, so ties keep their stored
/// (newest-first) order.
pub fn filter_tasks<'a>(tasks: &'a [Task], view: &ViewState, today: NaiveDate) -> Vec<&'a Task> {
    let query = view.search.trim();
    let mut out: Vec<&Task> = if !query.is_empty() {
        let needle = query.to_lowercase();
        tasks
            .iter()
            .filter(|t| t.text.to_lowercase().contains(&needle))
            .filter(|t| matches_filters(t, &view.filters))
            .collect()
    } else {
        tasks
            .iter()
            .filter(|t| matches_scope(t, &view.scope, today))
            .collect()
    };

    out.sort_by_key(|t| Reverse(t.priority.rank()));
    out
}

fn matches_scope(task: &Task, scope: &Scope, today: NaiveDate) -> bool {
    match scope {
        Scope::All => true,
        Scope::Today => task.date == Some(today),
        Scope::Important => task.important,
        Scope::Planned => {
            let horizon = today
                .checked_add_days(Days::new(PLANNED_WINDOW_DAYS))
                .unwrap_or(today);
            task.date
                .map(|d| d >= today && d <= horizon)
                .unwrap_or(false)
        }
        // Ownership stub: every task counts as assigned
        Scope::Assigned => true,
        Scope::List(name) => task.list == *name,
        Scope::DateRange { start, end } => task
            .date
            .map(|d| d >= *start && d <= *end)
            .unwrap_or(false),
    }
}

fn matches_filters(task: &Task, filters: &SearchFilters) -> bool {
    if !filters.priority.is_empty() && !filters.priority.contains(&task.priority) {
        return false;
    }
    if !filters.list.is_empty() && !filters.list.contains(&task.list) {
        return false;
    }
    if !filters.tags.is_empty() && !task.tags.iter().any(|tag| filters.tags.contains(tag)) {
        return false;
    }
    if let Some(completed) = filters.completed
        && task.completed != completed
    {
        return false;
    }
    if let Some(recurring) = filters.recurring
        && task.recurring.is_some() != recurring
    {
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
