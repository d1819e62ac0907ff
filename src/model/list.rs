use serde::{Deserialize, Serialize};

/// Name of the implicit list every task belongs to unless assigned
/// elsewhere. It has no `List` entry and cannot be deleted.
pub const DEFAULT_LIST: &str = "default";

/// Store-assigned list identifier
pub type ListId = u64;

/// A user-created task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
}
