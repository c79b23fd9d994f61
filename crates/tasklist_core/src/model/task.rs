//! Task record.
//!
//! # Invariants
//! - `id` is generated once and never reused for another task.
//! - `title` is stored as given. Blank titles are filtered by the list
//!   controller, not by the model or the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of one persisted task.
pub type TaskId = Uuid;

/// The only persisted entity: a title with an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
}

impl Task {
    /// Creates a task with a freshly generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a task with a caller-provided id (used when decoding rows).
    pub fn with_id(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Returns whether user-entered text may become a task title.
///
/// Empty and whitespace-only input is rejected.
pub fn is_valid_title(text: &str) -> bool {
    !text.trim().is_empty()
}
