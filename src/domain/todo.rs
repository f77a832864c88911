use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub done: bool,
}

/// Body of a create request. An `id` sent by the client is not part of the
/// type and is dropped during deserialization; the store assigns one.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// Partial update. `None` (absent or `null`) keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub done: Option<bool>,
}

impl Todo {
    /// Merges `patch` over this record. The id never changes.
    pub fn apply(self, patch: TodoPatch) -> Todo {
        Todo {
            id: self.id,
            text: patch.text.unwrap_or(self.text),
            done: patch.done.unwrap_or(self.done),
        }
    }
}
