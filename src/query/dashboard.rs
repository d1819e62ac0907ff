use chrono::NaiveDate;

use crate::model::task::{Priority, Task};

/// Counts of today's not-yet-completed tasks per priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingByPriority {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PendingByPriority {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Completion numbers for one priority bucket of today's tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    /// `round(completed / total * 100)`; 0 for an empty bucket
    pub percentage: u32,
}

/// Per-priority completion stats across today's tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionByPriority {
    pub high: CompletionStats,
    pub medium: CompletionStats,
    pub low: CompletionStats,
}

impl CompletionByPriority {
    pub fn get(&self, priority: Priority) -> CompletionStats {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Today's pending (not completed) tasks, counted per priority
pub fn pending_by_priority(tasks: &[Task], today: NaiveDate) -> PendingByPriority {
    let mut out = PendingByPriority::default();
    for task in tasks {
        if task.completed || task.date != Some(today) {
            continue;
        }
        match task.priority {
            Priority::High => out.high += 1,
            Priority::Medium => out.medium += 1,
            Priority::Low => out.low += 1,
        }
    }
    out
}

/// Completion stats per priority across all of today's tasks
pub fn completion_by_priority(tasks: &[Task], today: NaiveDate) -> CompletionByPriority {
    let mut out = CompletionByPriority::default();
    for task in tasks {
        if task.date != Some(today) {
            continue;
        }
        let bucket = match task.priority {
            Priority::High => &mut out.high,
            Priority::Medium => &mut out.medium,
            Priority::Low => &mut out.low,
        };
        bucket.total += 1;
        if task.completed {
            bucket.completed += 1;
        }
    }
    out.high.percentage = percentage(out.high.completed, out.high.total);
    out.medium.percentage = percentage(out.medium.completed, out.medium.total);
    out.low.percentage = percentage(out.low.completed, out.low.total);
    out
}

/// Completion percentage across all of today's tasks regardless of priority
pub fn overall_completion(tasks: &[Task], today: NaiveDate) -> u32 {
    let today_tasks: Vec<&Task> = tasks.iter().filter(|t| t.date == Some(today)).collect();
    let completed = today_tasks.iter().filter(|t| t.completed).count();
    percentage(completed, today_tasks.len())
}

/// Every distinct tag across the collection, in first-seen order
pub fn all_tags(tasks: &[Task]) -> Vec<String> {
    let mut seen = indexmap::IndexSet::new();
    for task in tasks {
        for tag in &task.tags {
            seen.insert(tag.clone());
        }
    }
    seen.into_iter().collect()
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
