use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use tracing::debug;

use crate::interact::Interact;
use crate::model::list::{DEFAULT_LIST, List, ListId};
use crate::model::task::{
    Column, Recurrence, Subtask, SubtaskId, Task, TaskDraft, TaskId,
};

/// Error type for store operations.
///
/// These are domain rejections, not failures: stale ids and blank text are
/// expected inputs from an interactive surface and must never panic.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("subtask not found: {0}")]
    SubtaskNotFound(SubtaskId),
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("a list named '{0}' already exists")]
    DuplicateList(String),
    #[error("the default list cannot be deleted")]
    DefaultListProtected,
    #[error("dependency target not found: {0}")]
    DependencyNotFound(TaskId),
}

/// Outcome of a completion toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The task is now completed
    Completed,
    /// The task is back to not-completed
    Reopened,
    /// Refused: the task's dependency is not completed. State unchanged;
    /// the user has been notified.
    Blocked,
}

/// Owns the in-memory task collection and list registry.
///
/// One store per session; everything resets when the session ends. All
/// mutation goes through the operations here; the query layer only reads.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    lists: Vec<List>,
    next_task_id: TaskId,
    next_subtask_id: SubtaskId,
    next_list_id: ListId,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore::default()
    }

    /// A store pre-populated with the given custom lists (blank and
    /// duplicate names are skipped).
    pub fn with_seed_lists<S: AsRef<str>>(names: &[S]) -> Self {
        let mut store = TaskStore::new();
        for name in names {
            let _ = store.add_list(name.as_ref());
        }
        store
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// All tasks, newest-created first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Custom lists, in creation order (the `"default"` list is implicit)
    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn list_by_name(&self, name: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.name == name)
    }

    // -----------------------------------------------------------------------
    // Task CRUD
    // -----------------------------------------------------------------------

    /// Create a task from a draft. Blank text is rejected; a draft date of
    /// `None` defaults to today; an unknown dependency target is rejected.
    /// The new task is prepended (newest-first insertion order).
    pub fn add_task(&mut self, draft: TaskDraft, today: NaiveDate) -> Result<TaskId, StoreError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        if let Some(dep) = draft.depends_on
            && self.task(dep).is_none()
        {
            return Err(StoreError::DependencyNotFound(dep));
        }

        self.next_task_id += 1;
        let mut task = Task::new(self.next_task_id, text.to_string());
        let date = draft.date.unwrap_or(today);
        task.date = Some(date);
        task.priority = draft.priority.unwrap_or_default();
        if let Some(list) = draft.list {
            task.list = list;
        }
        task.tags = draft
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<IndexSet<_>>();
        for text in draft.subtasks {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            self.next_subtask_id += 1;
            task.subtasks.push(Subtask {
                id: self.next_subtask_id,
                text: text.to_string(),
                completed: false,
            });
        }
        task.depends_on = draft.depends_on;
        task.recurring = draft.recurring.map(|kind| Recurrence {
            kind,
            last_generated: date,
        });
        task.reminder = draft.reminder;

        let id = task.id;
        debug!(id, text = %task.text, list = %task.list, "add task");
        self.tasks.insert(0, task);
        Ok(id)
    }

    /// Append a subtask to an existing task. Blank text is rejected.
    pub fn add_subtask(&mut self, task_id: TaskId, text: &str) -> Result<SubtaskId, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        if self.task(task_id).is_none() {
            return Err(StoreError::TaskNotFound(task_id));
        }
        self.next_subtask_id += 1;
        let id = self.next_subtask_id;
        let task = self.task_mut(task_id).expect("checked above");
        task.subtasks.push(Subtask {
            id,
            text: text.to_string(),
            completed: false,
        });
        Ok(id)
    }

    /// Flip a task's completed flag.
    ///
    /// Completing a task whose dependency is itself not completed is
    /// refused: the user is notified through `interact` and the task is
    /// left unchanged. Completing forces `in_progress` off.
    pub fn toggle_complete(
        &mut self,
        id: TaskId,
        interact: &mut dyn Interact,
    ) -> Result<Toggle, StoreError> {
        let task = self.task(id).ok_or(StoreError::TaskNotFound(id))?;

        if !task.completed {
            // A dependency that no longer exists does not block
            if let Some(dep_id) = task.depends_on
                && let Some(dep) = self.task(dep_id)
                && !dep.completed
            {
                debug!(id, dep = dep_id, "completion blocked by dependency");
                interact.notify("You need to complete the dependency task first!");
                return Ok(Toggle::Blocked);
            }
            let task = self.task_mut(id).expect("checked above");
            task.completed = true;
            task.in_progress = false;
            Ok(Toggle::Completed)
        } else {
            let task = self.task_mut(id).expect("checked above");
            task.completed = false;
            Ok(Toggle::Reopened)
        }
    }

    /// Flip the important flag; returns the new value.
    pub fn toggle_important(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let task = self.task_mut(id).ok_or(StoreError::TaskNotFound(id))?;
        task.important = !task.important;
        Ok(task.important)
    }

    /// Flip a subtask's completed flag; returns the new value.
    pub fn toggle_subtask_complete(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> Result<bool, StoreError> {
        let task = self
            .task_mut(task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(StoreError::SubtaskNotFound(subtask_id))?;
        subtask.completed = !subtask.completed;
        Ok(subtask.completed)
    }

    /// Delete a task.
    ///
    /// If other tasks depend on it, the user must confirm; on confirmation
    /// the dependents have `depends_on` cleared (never cascade-deleted).
    /// Returns `false` when the user declined.
    pub fn delete_task(
        &mut self,
        id: TaskId,
        interact: &mut dyn Interact,
    ) -> Result<bool, StoreError> {
        if self.task(id).is_none() {
            return Err(StoreError::TaskNotFound(id));
        }

        let has_dependents = self.tasks.iter().any(|t| t.depends_on == Some(id));
        if has_dependents {
            let proceed = interact.confirm(
                "This task has dependent tasks. Deleting it will remove the dependency. Continue?",
            );
            if !proceed {
                return Ok(false);
            }
            for task in self.tasks.iter_mut() {
                if task.depends_on == Some(id) {
                    task.depends_on = None;
                }
            }
        }

        debug!(id, "delete task");
        self.tasks.retain(|t| t.id != id);
        Ok(true)
    }

    /// Remove one subtask from a task.
    pub fn delete_subtask(
        &mut self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> Result<(), StoreError> {
        let task = self
            .task_mut(task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;
        let before = task.subtasks.len();
        task.subtasks.retain(|s| s.id != subtask_id);
        if task.subtasks.len() == before {
            return Err(StoreError::SubtaskNotFound(subtask_id));
        }
        Ok(())
    }

    /// Place a task in a kanban column by setting its flag pair.
    pub fn move_task_to_column(&mut self, id: TaskId, column: Column) -> Result<(), StoreError> {
        let task = self.task_mut(id).ok_or(StoreError::TaskNotFound(id))?;
        match column {
            Column::Todo => {
                task.completed = false;
                task.in_progress = false;
            }
            Column::InProgress => {
                task.completed = false;
                task.in_progress = true;
            }
            Column::Done => {
                task.completed = true;
                task.in_progress = false;
            }
        }
        Ok(())
    }

    /// Set or replace a task's reminder; re-arms the shown latch.
    pub fn set_reminder(&mut self, id: TaskId, when: NaiveDateTime) -> Result<(), StoreError> {
        let task = self.task_mut(id).ok_or(StoreError::TaskNotFound(id))?;
        task.reminder = Some(when);
        task.reminder_shown = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Scheduler hooks
    // -----------------------------------------------------------------------

    /// Materialize one occurrence of a recurring task: copy its
    /// text/importance/priority/list into a fresh task dated `date` with
    /// `parent_id` set, and advance the parent's `last_generated`.
    ///
    /// Returns `None` when the parent is gone or not recurring (a stale id
    /// from a tick computed against an earlier snapshot).
    pub fn spawn_occurrence(&mut self, parent_id: TaskId, date: NaiveDate) -> Option<TaskId> {
        let parent = self.task(parent_id)?;
        parent.recurring?;
        let parent_text = parent.text.clone();
        let parent_important = parent.important;
        let parent_priority = parent.priority;
        let parent_list = parent.list.clone();

        self.next_task_id += 1;
        let mut spawned = Task::new(self.next_task_id, parent_text);
        spawned.important = parent_important;
        spawned.priority = parent_priority;
        spawned.list = parent_list;
        spawned.date = Some(date);
        spawned.parent_id = Some(parent_id);
        let id = spawned.id;

        let parent = self.task_mut(parent_id).expect("checked above");
        if let Some(rec) = parent.recurring.as_mut() {
            rec.last_generated = date;
        }
        debug!(id, parent = parent_id, %date, "spawn recurring occurrence");
        self.tasks.insert(0, spawned);
        Some(id)
    }

    /// Latch a fired reminder so it never fires again.
    pub fn mark_reminder_shown(&mut self, id: TaskId) {
        if let Some(task) = self.task_mut(id) {
            task.reminder_shown = true;
        }
    }

    // -----------------------------------------------------------------------
    // List management
    // -----------------------------------------------------------------------

    /// Create a custom list. Blank names and names already taken (including
    /// `"default"`) are rejected.
    pub fn add_list(&mut self, name: &str) -> Result<ListId, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyText);
        }
        if name == DEFAULT_LIST || self.list_by_name(name).is_some() {
            return Err(StoreError::DuplicateList(name.to_string()));
        }
        self.next_list_id += 1;
        let id = self.next_list_id;
        debug!(id, name, "add list");
        self.lists.push(List {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Delete a custom list. Its tasks move to the `"default"` list; tasks
    /// are never deleted as a side effect. Returns the deleted list's name
    /// so the caller can reset the view if it was active.
    pub fn delete_list(&mut self, id: ListId) -> Result<String, StoreError> {
        let Some(pos) = self.lists.iter().position(|l| l.id == id) else {
            return Err(StoreError::ListNotFound(format!("id {}", id)));
        };
        let name = self.lists.remove(pos).name;
        for task in self.tasks.iter_mut() {
            if task.list == name {
                task.list = DEFAULT_LIST.to_string();
            }
        }
        debug!(id, %name, "delete list");
        Ok(name)
    }

    /// Resolve a list name to its id, guarding the implicit default list.
    pub fn list_id_by_name(&self, name: &str) -> Result<ListId, StoreError> {
        if name == DEFAULT_LIST {
            return Err(StoreError::DefaultListProtected);
        }
        self.list_by_name(name)
            .map(|l| l.id)
            .ok_or_else(|| StoreError::ListNotFound(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interact::Recorder;
    use crate::model::task::{Priority, RecurrenceKind};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn add(store: &mut TaskStore, text: &str) -> TaskId {
        store.add_task(TaskDraft::new(text), today()).unwrap()
    }

    // --- add_task ---

    #[test]
    fn test_add_task_defaults() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "Pay rent");
        let task = store.task(id).unwrap();
        assert!(!task.completed);
        assert!(!task.important);
        assert!(!task.in_progress);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.date, Some(today()));
        assert_eq!(task.list, "default");
    }

    #[test]
    fn test_add_task_blank_text_rejected() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.add_task(TaskDraft::new("   "), today()),
            Err(StoreError::EmptyText)
        );
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_add_task_prepends() {
        let mut store = TaskStore::new();
        add(&mut store, "first");
        add(&mut store, "second");
        assert_eq!(store.tasks()[0].text, "second");
        assert_eq!(store.tasks()[1].text, "first");
    }

    #[test]
    fn test_add_task_dedupes_tags() {
        let mut store = TaskStore::new();
        let mut draft = TaskDraft::new("tagged");
        draft.tags = vec!["home".into(), "bills".into(), "home".into()];
        let id = store.add_task(draft, today()).unwrap();
        let task = store.task(id).unwrap();
        assert_eq!(task.tags.len(), 2);
        assert!(task.tags.contains("home"));
        assert!(task.tags.contains("bills"));
    }

    #[test]
    fn test_add_task_unknown_dependency_rejected() {
        let mut store = TaskStore::new();
        let mut draft = TaskDraft::new("dependent");
        draft.depends_on = Some(99);
        assert_eq!(
            store.add_task(draft, today()),
            Err(StoreError::DependencyNotFound(99))
        );
    }

    #[test]
    fn test_add_task_recurring_seeds_last_generated() {
        let mut store = TaskStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let mut draft = TaskDraft::new("standup");
        draft.date = Some(date);
        draft.recurring = Some(RecurrenceKind::Daily);
        let id = store.add_task(draft, today()).unwrap();
        let rec = store.task(id).unwrap().recurring.unwrap();
        assert_eq!(rec.kind, RecurrenceKind::Daily);
        assert_eq!(rec.last_generated, date);
    }

    // --- toggle_complete ---

    #[test]
    fn test_toggle_complete_round_trip() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "task");
        let mut ui = Recorder::default();

        assert_eq!(store.toggle_complete(id, &mut ui), Ok(Toggle::Completed));
        assert!(store.task(id).unwrap().completed);

        assert_eq!(store.toggle_complete(id, &mut ui), Ok(Toggle::Reopened));
        assert!(!store.task(id).unwrap().completed);
    }

    #[test]
    fn test_complete_clears_in_progress() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "task");
        store.move_task_to_column(id, Column::InProgress).unwrap();
        assert!(store.task(id).unwrap().in_progress);

        let mut ui = Recorder::default();
        store.toggle_complete(id, &mut ui).unwrap();
        let task = store.task(id).unwrap();
        assert!(task.completed);
        assert!(!task.in_progress);
    }

    #[test]
    fn test_dependency_gates_completion() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A");
        let mut draft = TaskDraft::new("B");
        draft.depends_on = Some(a);
        let b = store.add_task(draft, today()).unwrap();

        let mut ui = Recorder::default();
        assert_eq!(store.toggle_complete(b, &mut ui), Ok(Toggle::Blocked));
        assert!(!store.task(b).unwrap().completed);
        assert_eq!(
            ui.notices,
            vec!["You need to complete the dependency task first!"]
        );

        // Completing the dependency unblocks B
        store.toggle_complete(a, &mut ui).unwrap();
        assert_eq!(store.toggle_complete(b, &mut ui), Ok(Toggle::Completed));
        assert!(store.task(b).unwrap().completed);
    }

    #[test]
    fn test_reopening_never_gated() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A");
        let mut ui = Recorder::default();
        store.toggle_complete(a, &mut ui).unwrap();
        // Reopen while some other task depends on it: allowed
        let mut draft = TaskDraft::new("B");
        draft.depends_on = Some(a);
        store.add_task(draft, today()).unwrap();
        assert_eq!(store.toggle_complete(a, &mut ui), Ok(Toggle::Reopened));
    }

    #[test]
    fn test_toggle_unknown_id_is_error_not_panic() {
        let mut store = TaskStore::new();
        let mut ui = Recorder::default();
        assert_eq!(
            store.toggle_complete(42, &mut ui),
            Err(StoreError::TaskNotFound(42))
        );
    }

    // --- delete_task ---

    #[test]
    fn test_delete_plain_task() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "gone");
        let mut ui = Recorder::default();
        assert_eq!(store.delete_task(id, &mut ui), Ok(true));
        assert!(store.task(id).is_none());
        assert!(ui.prompts.is_empty()); // no dependents, no confirmation
    }

    #[test]
    fn test_delete_with_dependents_confirmed() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A");
        let mut draft = TaskDraft::new("B");
        draft.depends_on = Some(a);
        let b = store.add_task(draft, today()).unwrap();

        let mut ui = Recorder::answering(true);
        assert_eq!(store.delete_task(a, &mut ui), Ok(true));
        assert_eq!(ui.prompts.len(), 1);
        assert!(store.task(a).is_none());
        // Dependent survives with its dependency cleared
        let b_task = store.task(b).unwrap();
        assert_eq!(b_task.depends_on, None);
    }

    #[test]
    fn test_delete_with_dependents_declined() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A");
        let mut draft = TaskDraft::new("B");
        draft.depends_on = Some(a);
        let b = store.add_task(draft, today()).unwrap();

        let mut ui = Recorder::answering(false);
        assert_eq!(store.delete_task(a, &mut ui), Ok(false));
        assert!(store.task(a).is_some());
        assert_eq!(store.task(b).unwrap().depends_on, Some(a));
    }

    // --- subtasks ---

    #[test]
    fn test_subtask_add_toggle_delete() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "parent");
        let sub = store.add_subtask(id, "step one").unwrap();

        assert_eq!(store.toggle_subtask_complete(id, sub), Ok(true));
        assert_eq!(store.toggle_subtask_complete(id, sub), Ok(false));

        store.delete_subtask(id, sub).unwrap();
        assert!(store.task(id).unwrap().subtasks.is_empty());
    }

    #[test]
    fn test_subtask_blank_text_rejected() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "parent");
        assert_eq!(store.add_subtask(id, "  "), Err(StoreError::EmptyText));
    }

    #[test]
    fn test_subtask_unknown_ids() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "parent");
        assert_eq!(
            store.toggle_subtask_complete(id, 99),
            Err(StoreError::SubtaskNotFound(99))
        );
        assert_eq!(
            store.delete_subtask(77, 1),
            Err(StoreError::TaskNotFound(77))
        );
    }

    // --- kanban moves ---

    #[test]
    fn test_move_to_column_sets_flag_pair() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "task");

        store.move_task_to_column(id, Column::InProgress).unwrap();
        let task = store.task(id).unwrap();
        assert!(!task.completed);
        assert!(task.in_progress);

        store.move_task_to_column(id, Column::Done).unwrap();
        let task = store.task(id).unwrap();
        assert!(task.completed);
        assert!(!task.in_progress);

        store.move_task_to_column(id, Column::Todo).unwrap();
        let task = store.task(id).unwrap();
        assert!(!task.completed);
        assert!(!task.in_progress);
    }

    // --- lists ---

    #[test]
    fn test_add_list_rejects_blank_and_duplicates() {
        let mut store = TaskStore::new();
        store.add_list("Work").unwrap();
        assert_eq!(store.add_list(""), Err(StoreError::EmptyText));
        assert_eq!(
            store.add_list("Work"),
            Err(StoreError::DuplicateList("Work".into()))
        );
        assert_eq!(
            store.add_list("default"),
            Err(StoreError::DuplicateList("default".into()))
        );
    }

    #[test]
    fn test_delete_list_reassigns_tasks() {
        let mut store = TaskStore::with_seed_lists(&["Work", "Personal"]);
        let mut draft = TaskDraft::new("Pay rent");
        draft.list = Some("Work".into());
        let id = store.add_task(draft, today()).unwrap();

        let list_id = store.list_id_by_name("Work").unwrap();
        let name = store.delete_list(list_id).unwrap();
        assert_eq!(name, "Work");
        // Task survives, moved to default
        assert_eq!(store.task(id).unwrap().list, "default");
        assert!(store.list_by_name("Work").is_none());
    }

    #[test]
    fn test_default_list_protected() {
        let store = TaskStore::new();
        assert_eq!(
            store.list_id_by_name("default"),
            Err(StoreError::DefaultListProtected)
        );
    }

    // --- scheduler hooks ---

    #[test]
    fn test_spawn_occurrence_copies_and_advances() {
        let mut store = TaskStore::with_seed_lists(&["Work"]);
        let mut draft = TaskDraft::new("standup");
        draft.list = Some("Work".into());
        draft.priority = Some(Priority::High);
        draft.date = Some(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        draft.recurring = Some(RecurrenceKind::Daily);
        let parent = store.add_task(draft, today()).unwrap();
        store.toggle_important(parent).unwrap();

        let spawned = store.spawn_occurrence(parent, today()).unwrap();
        let child = store.task(spawned).unwrap();
        assert_eq!(child.text, "standup");
        assert!(child.important);
        assert_eq!(child.priority, Priority::High);
        assert_eq!(child.list, "Work");
        assert_eq!(child.date, Some(today()));
        assert_eq!(child.parent_id, Some(parent));
        assert!(!child.completed);
        assert!(child.recurring.is_none());

        let rec = store.task(parent).unwrap().recurring.unwrap();
        assert_eq!(rec.last_generated, today());
    }

    #[test]
    fn test_spawn_occurrence_non_recurring_is_noop() {
        let mut store = TaskStore::new();
        let id = add(&mut store, "plain");
        assert_eq!(store.spawn_occurrence(id, today()), None);
        assert_eq!(store.spawn_occurrence(999, today()), None);
    }
}
