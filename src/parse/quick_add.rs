use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::model::task::{Priority, RecurrenceKind, TaskDraft};

/// Error type for quick-add parsing
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuickAddError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("unknown priority: {0} (expected high, medium, or low)")]
    BadPriority(String),
    #[error("unknown date: {0} (expected today, tomorrow, or YYYY-MM-DD)")]
    BadDate(String),
    #[error("unknown recurrence: {0} (expected daily, weekly, monthly, or yearly)")]
    BadRecurrence(String),
    #[error("invalid dependency id: {0}")]
    BadDependency(String),
    #[error("invalid reminder: {0} (expected YYYY-MM-DDTHH:MM)")]
    BadReminder(String),
}

/// Build a task draft from quick-add tokens.
///
/// Plain words become the task text. Anywhere in the line, `#tag` adds a
/// tag and `pri:`, `list:`, `date:`, `every:`, `dep:`, `remind:` set the
/// corresponding field. `date:` accepts `today`, `tomorrow`, or an ISO
/// date; `remind:` takes `YYYY-MM-DDTHH:MM`. Later duplicates of a keyed
/// token overwrite earlier ones.
pub fn parse_quick_add(tokens: &[String], today: NaiveDate) -> Result<TaskDraft, QuickAddError> {
    let mut draft = TaskDraft::default();
    let mut words: Vec<&str> = Vec::new();

    for token in tokens {
        if let Some(tag) = token.strip_prefix('#')
            && !tag.is_empty()
            && !tag.contains('#')
        {
            draft.tags.push(tag.to_string());
        } else if let Some(value) = token.strip_prefix("pri:") {
            draft.priority = Some(
                Priority::parse(value).ok_or_else(|| QuickAddError::BadPriority(value.into()))?,
            );
        } else if let Some(value) = token.strip_prefix("list:") {
            draft.list = Some(value.to_string());
        } else if let Some(value) = token.strip_prefix("date:") {
            draft.date = Some(parse_date(value, today)?);
        } else if let Some(value) = token.strip_prefix("every:") {
            draft.recurring = Some(
                RecurrenceKind::parse(value)
                    .ok_or_else(|| QuickAddError::BadRecurrence(value.into()))?,
            );
        } else if let Some(value) = token.strip_prefix("dep:") {
            let id = value
                .parse()
                .map_err(|_| QuickAddError::BadDependency(value.into()))?;
            draft.depends_on = Some(id);
        } else if let Some(value) = token.strip_prefix("remind:") {
            draft.reminder = Some(parse_reminder(value)?);
        } else {
            words.push(token);
        }
    }

    draft.text = words.join(" ");
    if draft.text.trim().is_empty() {
        return Err(QuickAddError::EmptyText);
    }
    Ok(draft)
}

fn parse_date(value: &str, today: NaiveDate) -> Result<NaiveDate, QuickAddError> {
    match value {
        "today" => Ok(today),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| QuickAddError::BadDate(value.into())),
        _ => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| QuickAddError::BadDate(value.into())),
    }
}

fn parse_reminder(value: &str) -> Result<NaiveDateTime, QuickAddError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map_err(|_| QuickAddError::BadReminder(value.into()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
