use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::task::{Column, Subtask, Task};
use crate::query::board::BoardColumn;
use crate::query::dashboard::{CompletionByPriority, CompletionStats, PendingByPriority};
use crate::query::group::DateGroup;

/// Width of one kanban column in the text board
const BOARD_COL_WIDTH: usize = 28;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub important: bool,
    pub in_progress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub priority: String,
    pub list: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub id: String,
    pub name: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub date: String,
    pub label: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CompletionJson {
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

#[derive(Serialize)]
pub struct DashboardJson {
    pub overall_percentage: u32,
    pub high: CompletionJson,
    pub medium: CompletionJson,
    pub low: CompletionJson,
    pub pending_high: usize,
    pub pending_medium: usize,
    pub pending_low: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        important: task.important,
        in_progress: task.in_progress,
        date: task.date.map(|d| d.to_string()),
        priority: task.priority.label().to_string(),
        list: task.list.clone(),
        tags: task.tags.iter().cloned().collect(),
        subtasks: task.subtasks.iter().map(subtask_to_json).collect(),
        depends_on: task.depends_on,
        recurring: task.recurring.map(|r| r.kind.label().to_string()),
        reminder: task.reminder.map(|r| r.format("%Y-%m-%dT%H:%M").to_string()),
        parent_id: task.parent_id,
    }
}

fn subtask_to_json(subtask: &Subtask) -> SubtaskJson {
    SubtaskJson {
        id: subtask.id,
        text: subtask.text.clone(),
        completed: subtask.completed,
    }
}

pub fn board_to_json(columns: &[BoardColumn<'_>; 3]) -> Vec<ColumnJson> {
    columns
        .iter()
        .map(|col| ColumnJson {
            id: column_id(col.column).to_string(),
            name: col.column.name().to_string(),
            tasks: col.tasks.iter().map(|t| task_to_json(t)).collect(),
        })
        .collect()
}

pub fn groups_to_json(groups: &[DateGroup<'_>]) -> Vec<GroupJson> {
    groups
        .iter()
        .map(|g| GroupJson {
            date: g.date.to_string(),
            label: g.label.clone(),
            tasks: g.tasks.iter().map(|t| task_to_json(t)).collect(),
        })
        .collect()
}

pub fn dashboard_to_json(
    pending: PendingByPriority,
    completion: CompletionByPriority,
    overall: u32,
) -> DashboardJson {
    fn convert(stats: CompletionStats) -> CompletionJson {
        CompletionJson {
            total: stats.total,
            completed: stats.completed,
            percentage: stats.percentage,
        }
    }
    DashboardJson {
        overall_percentage: overall,
        high: convert(completion.high),
        medium: convert(completion.medium),
        low: convert(completion.low),
        pending_high: pending.high,
        pending_medium: pending.medium,
        pending_low: pending.low,
    }
}

fn column_id(column: Column) -> &'static str {
    match column {
        Column::Todo => "todo",
        Column::InProgress => "inprogress",
        Column::Done => "done",
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn checkbox(task: &Task) -> char {
    match Column::of(task) {
        Column::Done => 'x',
        Column::InProgress => '>',
        Column::Todo => ' ',
    }
}

/// One task as a list row:
/// `[ ]   3 *Pay rent [high] (Work, 2026-08-07) #bills dep:2 every:daily [1/3]`
pub fn render_task_line(task: &Task) -> String {
    let mut line = format!("[{}] {:>3} ", checkbox(task), task.id);
    if task.important {
        line.push('*');
    }
    line.push_str(&task.text);

    if task.priority != crate::model::task::Priority::Medium {
        line.push_str(&format!(" [{}]", task.priority.label()));
    }

    let mut meta = Vec::new();
    if task.list != crate::model::list::DEFAULT_LIST {
        meta.push(task.list.clone());
    }
    if let Some(date) = task.date {
        meta.push(date.to_string());
    }
    if !meta.is_empty() {
        line.push_str(&format!(" ({})", meta.join(", ")));
    }

    for tag in &task.tags {
        line.push_str(&format!(" #{}", tag));
    }
    if let Some(dep) = task.depends_on {
        line.push_str(&format!(" dep:{}", dep));
    }
    if let Some(rec) = task.recurring {
        line.push_str(&format!(" every:{}", rec.kind.label()));
    }
    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        line.push_str(&format!(" [{}/{}]", done, task.subtasks.len()));
    }
    line
}

/// The filtered view as one row per task. The expanded task (if it is in
/// the view) gets its subtasks inlined beneath it.
pub fn render_task_list(tasks: &[&Task], expanded: Option<u64>) -> String {
    if tasks.is_empty() {
        return "no tasks\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        out.push_str(&render_task_line(task));
        out.push('\n');
        if expanded == Some(task.id) {
            for subtask in &task.subtasks {
                out.push_str(&render_subtask_line(subtask));
            }
        }
    }
    out
}

fn render_subtask_line(subtask: &Subtask) -> String {
    format!(
        "    [{}] {:>3} {}\n",
        if subtask.completed { 'x' } else { ' ' },
        subtask.id,
        subtask.text
    )
}

/// One task in full, subtasks indented beneath
pub fn render_task_detail(task: &Task) -> String {
    let mut out = render_task_line(task);
    out.push('\n');
    if let Some(reminder) = task.reminder {
        out.push_str(&format!(
            "    remind: {}{}\n",
            reminder.format("%Y-%m-%dT%H:%M"),
            if task.reminder_shown { " (shown)" } else { "" }
        ));
    }
    if let Some(parent) = task.parent_id {
        out.push_str(&format!("    spawned from: {}\n", parent));
    }
    for subtask in &task.subtasks {
        out.push_str(&render_subtask_line(subtask));
    }
    out
}

/// The kanban board as three side-by-side columns
pub fn render_board(columns: &[BoardColumn<'_>; 3]) -> String {
    let mut out = String::new();

    let headers: Vec<String> = columns
        .iter()
        .map(|col| pad(&format!("{} ({})", col.column.name(), col.tasks.len()), BOARD_COL_WIDTH))
        .collect();
    out.push_str(headers.join("  ").trim_end());
    out.push('\n');

    let rows = columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    for row in 0..rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| match col.tasks.get(row) {
                Some(task) => {
                    let cell = format!("[{}] {} {}", checkbox(task), task.id, task.text);
                    pad(&truncate_to_width(&cell, BOARD_COL_WIDTH), BOARD_COL_WIDTH)
                }
                None => pad("", BOARD_COL_WIDTH),
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// The date-grouped view, one labeled section per date
pub fn render_groups(groups: &[DateGroup<'_>]) -> String {
    if groups.is_empty() {
        return "no dated tasks\n".to_string();
    }
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{}\n", group.label));
        for task in &group.tasks {
            out.push_str("  ");
            out.push_str(&render_task_line(task));
            out.push('\n');
        }
    }
    out
}

/// Today's completion dashboard
pub fn render_dashboard(
    pending: PendingByPriority,
    completion: CompletionByPriority,
    overall: u32,
) -> String {
    let mut out = format!("Today: {}% complete\n", overall);
    for (label, stats) in [
        ("high", completion.high),
        ("medium", completion.medium),
        ("low", completion.low),
    ] {
        out.push_str(&format!(
            "  {:<8} {:>2}/{:<2} {:>4}%\n",
            label, stats.completed, stats.total, stats.percentage
        ));
    }
    out.push_str(&format!(
        "Pending: {} high, {} medium, {} low\n",
        pending.high, pending.medium, pending.low
    ));
    out
}

/// Pad to `width` display columns with trailing spaces
fn pad(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    for _ in current..width {
        out.push(' ');
    }
    out
}

/// Cut to at most `width` display columns, never splitting a wide char
fn truncate_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
