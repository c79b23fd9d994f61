//! Core of the task list: storage bootstrap, task store and list controller.
//! Front-ends own a `TaskListController` and implement its view/prompt traits.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{is_valid_title, Task, TaskId};
pub use repo::task_store::{RenameOutcome, SqliteTaskStore, StoreError, StoreResult, TaskStore};
pub use service::list_controller::{
    ControllerError, ControllerResult, ListChange, PromptRequest, PromptResponse,
    TaskListController, TaskListView, TextPrompt, LIST_TITLE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
