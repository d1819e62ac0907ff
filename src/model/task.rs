use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Store-assigned task identifier (monotonic, unique within a session)
pub type TaskId = u64;

/// Store-assigned subtask identifier
pub type SubtaskId = u64;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort weight: high sorts before medium sorts before low
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "high" | "h" => Some(Priority::High),
            "medium" | "med" | "m" => Some(Priority::Medium),
            "low" | "l" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// How often a recurring task repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    pub fn parse(s: &str) -> Option<RecurrenceKind> {
        match s {
            "daily" => Some(RecurrenceKind::Daily),
            "weekly" => Some(RecurrenceKind::Weekly),
            "monthly" => Some(RecurrenceKind::Monthly),
            "yearly" => Some(RecurrenceKind::Yearly),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Yearly => "yearly",
        }
    }
}

/// Recurrence state carried by a repeating task.
/// `last_generated` is the date of the most recent occurrence the scheduler
/// has materialized (the task's own date at creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub kind: RecurrenceKind,
    pub last_generated: NaiveDate,
}

/// An independently completable step within a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub text: String,
    pub completed: bool,
}

/// Which kanban column a task sits in, derived from its flag pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Todo,
    #[serde(rename = "inprogress")]
    InProgress,
    Done,
}

impl Column {
    pub fn of(task: &Task) -> Column {
        match (task.completed, task.in_progress) {
            (true, _) => Column::Done,
            (false, true) => Column::InProgress,
            (false, false) => Column::Todo,
        }
    }

    pub fn parse(s: &str) -> Option<Column> {
        match s {
            "todo" => Some(Column::Todo),
            "inprogress" => Some(Column::InProgress),
            "done" => Some(Column::Done),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Todo => "To Do",
            Column::InProgress => "In Progress",
            Column::Done => "Done",
        }
    }
}

/// A task with all its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display text (non-empty; creation rejects blank text)
    pub text: String,
    pub completed: bool,
    pub important: bool,
    /// Invariant: never true while `completed` is true
    pub in_progress: bool,
    /// Scheduled calendar date (no time component)
    pub date: Option<NaiveDate>,
    pub priority: Priority,
    /// Name of the owning list (`"default"` unless assigned elsewhere)
    pub list: String,
    /// Free-form tags; set semantics, first-seen order
    pub tags: IndexSet<String>,
    pub subtasks: Vec<Subtask>,
    /// Prerequisite task that must complete before this one can
    pub depends_on: Option<TaskId>,
    pub recurring: Option<Recurrence>,
    /// One-shot reminder instant
    pub reminder: Option<NaiveDateTime>,
    /// Latched once the reminder has fired
    pub reminder_shown: bool,
    /// Set on tasks spawned by recurrence projection
    pub parent_id: Option<TaskId>,
}

impl Task {
    /// Create a task with the given identity and text; everything else at
    /// its creation default.
    pub fn new(id: TaskId, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
            important: false,
            in_progress: false,
            date: None,
            priority: Priority::Medium,
            list: crate::model::list::DEFAULT_LIST.to_string(),
            tags: IndexSet::new(),
            subtasks: Vec::new(),
            depends_on: None,
            recurring: None,
            reminder: None,
            reminder_shown: false,
            parent_id: None,
        }
    }
}

/// Fields a caller may supply when creating a task. Anything left `None`
/// falls back to the creation defaults in `TaskStore::add_task`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub list: Option<String>,
    pub tags: Vec<String>,
    pub subtasks: Vec<String>,
    pub depends_on: Option<TaskId>,
    pub recurring: Option<RecurrenceKind>,
    pub reminder: Option<NaiveDateTime>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        TaskDraft {
            text: text.into(),
            ..TaskDraft::default()
        }
    }
}
