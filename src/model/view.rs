use chrono::NaiveDate;

use super::task::{Priority, TaskId};

/// The active view filter: which slice of the collection is displayed.
///
/// Sidebar categories, list selections, and calendar range selections all
/// land here as distinct variants, so the filter engine can match
/// exhaustively instead of sniffing label strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every task
    All,
    /// Tasks dated exactly today
    Today,
    /// Tasks flagged important
    Important,
    /// Tasks dated within the planned window (today through today + 30 days)
    Planned,
    /// Ownership stub: every task counts as assigned
    Assigned,
    /// Tasks belonging to the named list (including `"default"`)
    List(String),
    /// Tasks dated within an inclusive calendar range
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl Scope {
    /// Display label, mirroring the sidebar wording
    pub fn label(&self) -> String {
        match self {
            Scope::All => "All Tasks".to_string(),
            Scope::Today => "Today".to_string(),
            Scope::Important => "Important".to_string(),
            Scope::Planned => "Planned".to_string(),
            Scope::Assigned => "Assigned to me".to_string(),
            Scope::List(name) => name.clone(),
            Scope::DateRange { start, end } => format!("{} to {}", start, end),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Today
    }
}

/// Structured filters layered on top of an active text search.
/// Each populated field constrains the result; empty fields impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub priority: Vec<Priority>,
    pub list: Vec<String>,
    pub tags: Vec<String>,
    pub completed: Option<bool>,
    pub recurring: Option<bool>,
}

impl SearchFilters {
    /// Toggle membership in the priority set
    pub fn toggle_priority(&mut self, value: Priority) {
        toggle_membership(&mut self.priority, value);
    }

    /// Toggle membership in the list set
    pub fn toggle_list(&mut self, value: String) {
        toggle_membership(&mut self.list, value);
    }

    /// Toggle membership in the tag set
    pub fn toggle_tag(&mut self, value: String) {
        toggle_membership(&mut self.tags, value);
    }

    /// Toggle the completed tri-state: selecting the current value clears it
    pub fn toggle_completed(&mut self, value: bool) {
        self.completed = if self.completed == Some(value) {
            None
        } else {
            Some(value)
        };
    }

    /// Toggle the recurring tri-state: selecting the current value clears it
    pub fn toggle_recurring(&mut self, value: bool) {
        self.recurring = if self.recurring == Some(value) {
            None
        } else {
            Some(value)
        };
    }

    pub fn clear(&mut self) {
        *self = SearchFilters::default();
    }

    pub fn is_empty(&self) -> bool {
        self.priority.is_empty()
            && self.list.is_empty()
            && self.tags.is_empty()
            && self.completed.is_none()
            && self.recurring.is_none()
    }
}

fn toggle_membership<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(pos) = set.iter().position(|v| *v == value) {
        set.remove(pos);
    } else {
        set.push(value);
    }
}

/// How the filtered tasks are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Kanban,
}

/// Ephemeral per-session view state. Nothing here survives the session.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub scope: Scope,
    /// Active search text; non-blank switches the filter engine into
    /// search mode and ignores the scope
    pub search: String,
    pub filters: SearchFilters,
    pub mode: ViewMode,
    /// Task whose subtasks are expanded in the list view
    pub expanded: Option<TaskId>,
}

impl ViewState {
    /// Called after a list is deleted: if the deleted list was the active
    /// scope, fall back to the default scope.
    pub fn on_list_deleted(&mut self, name: &str) {
        if matches!(&self.scope, Scope::List(active) if active == name) {
            self.scope = Scope::default();
        }
    }
}
