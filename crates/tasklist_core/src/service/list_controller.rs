//! Task list controller.
//!
//! # Responsibility
//! - Own the in-memory cache of tasks shown as rows.
//! - Translate add/edit/delete gestures into store calls.
//! - Reconcile cache and view after every successful store call.
//!
//! # Invariants
//! - Cache index `i` is visual row `i` at all times.
//! - Blank prompt input never reaches the store.
//! - Store failures leave cache and view untouched; they are logged and
//!   returned, never retried.

use crate::model::task::{is_valid_title, Task};
use crate::repo::task_store::{RenameOutcome, StoreError, TaskStore};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Screen title shown above the rows.
pub const LIST_TITLE: &str = "Task List";
const PROMPT_TITLE: &str = "New task";
const PROMPT_MESSAGE: &str = "What do you want to do?";
const NEW_TASK_PLACEHOLDER: &str = "New task...";

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    /// The underlying store call failed.
    Store(StoreError),
    /// A gesture referenced a row that is not on screen.
    RowOutOfRange { row: usize, row_count: usize },
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::RowOutOfRange { row, row_count } => {
                write!(f, "row {row} is out of range for {row_count} row(s)")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::RowOutOfRange { .. } => None,
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Modal text-entry request shown for add and edit flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: &'static str,
    pub message: &'static str,
    /// Hint shown when the field is empty.
    pub placeholder: String,
    /// Pre-filled text; `Some` only when editing an existing task.
    pub initial_text: Option<String>,
}

/// User answer to a `PromptRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Save(String),
    Cancel,
}

/// Modal text prompt presented by the host UI.
pub trait TextPrompt {
    fn present(&mut self, request: &PromptRequest) -> PromptResponse;
}

/// Row-level view updates issued after the cache changed.
pub trait TaskListView {
    fn reload_all(&mut self, tasks: &[Task]);
    fn insert_row(&mut self, row: usize, task: &Task);
    fn reload_row(&mut self, row: usize, task: &Task);
    fn delete_row(&mut self, row: usize);
}

/// What a controller flow did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    /// Cache replaced by a full fetch.
    Reloaded { row_count: usize },
    Inserted { row: usize },
    Updated { row: usize },
    Removed { row: usize, task: Task },
    /// Save with the same title; nothing written.
    Unchanged { row: usize },
    /// Blank input dropped before reaching the store.
    Discarded,
    Cancelled,
}

/// Controller owning the store handle and the row cache.
pub struct TaskListController<S: TaskStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Creates a controller with an empty cache. Call `load` to populate it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn row_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn title_at(&self, row: usize) -> Option<&str> {
        self.tasks.get(row).map(|task| task.title.as_str())
    }

    /// Rows formatted for line-oriented display, numbered from 1.
    pub fn render_rows(&self) -> Vec<String> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(row, task)| format!("{:>3}. {}", row + 1, task.title))
            .collect()
    }

    /// Replaces the cache with a full fetch from the store.
    ///
    /// On failure the previous cache is kept as is.
    pub fn load(&mut self, view: &mut impl TaskListView) -> ControllerResult<ListChange> {
        match self.store.fetch_all() {
            Ok(tasks) => {
                self.tasks = tasks;
                view.reload_all(&self.tasks);
                info!(
                    "event=task_list_load module=service status=ok row_count={}",
                    self.tasks.len()
                );
                Ok(ListChange::Reloaded {
                    row_count: self.tasks.len(),
                })
            }
            Err(err) => {
                error!("event=task_list_load module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Add flow: prompt for a title, create it and append one row.
    pub fn add_task(
        &mut self,
        prompt: &mut impl TextPrompt,
        view: &mut impl TaskListView,
    ) -> ControllerResult<ListChange> {
        let request = PromptRequest {
            title: PROMPT_TITLE,
            message: PROMPT_MESSAGE,
            placeholder: NEW_TASK_PLACEHOLDER.to_string(),
            initial_text: None,
        };
        let title = match accept_input(prompt.present(&request)) {
            Ok(title) => title,
            Err(change) => {
                debug!("event=task_create module=service status=skipped reason={change:?}");
                return Ok(change);
            }
        };

        let task = self.store.create(&title).map_err(|err| {
            error!("event=task_create module=service status=error error={err}");
            err
        })?;

        // Why: new tasks sort last by `seq`, so appending keeps the cache in
        // the same order a fresh `fetch_all` would return.
        self.tasks.push(task);
        let row = self.tasks.len() - 1;
        view.insert_row(row, &self.tasks[row]);
        info!(
            "event=task_create module=service status=ok task_id={} row={row}",
            self.tasks[row].id
        );
        Ok(ListChange::Inserted { row })
    }

    /// Edit flow: prompt pre-filled with the current title, then rename.
    pub fn edit_task(
        &mut self,
        row: usize,
        prompt: &mut impl TextPrompt,
        view: &mut impl TaskListView,
    ) -> ControllerResult<ListChange> {
        self.check_row(row)?;
        let current = self.tasks[row].title.clone();
        let request = PromptRequest {
            title: PROMPT_TITLE,
            message: PROMPT_MESSAGE,
            placeholder: current.clone(),
            initial_text: Some(current),
        };
        let title = match accept_input(prompt.present(&request)) {
            Ok(title) => title,
            Err(change) => {
                debug!(
                    "event=task_rename module=service status=skipped row={row} reason={change:?}"
                );
                return Ok(change);
            }
        };

        let task = &mut self.tasks[row];
        match self.store.rename(task, &title) {
            Ok(RenameOutcome::Renamed) => {
                view.reload_row(row, task);
                info!(
                    "event=task_rename module=service status=ok task_id={} row={row}",
                    task.id
                );
                Ok(ListChange::Updated { row })
            }
            Ok(RenameOutcome::Unchanged) => {
                debug!(
                    "event=task_rename module=service status=skipped task_id={} row={row} reason=unchanged",
                    task.id
                );
                Ok(ListChange::Unchanged { row })
            }
            Err(err) => {
                error!(
                    "event=task_rename module=service status=error task_id={} row={row} error={err}",
                    task.id
                );
                Err(err.into())
            }
        }
    }

    /// Delete flow (row swipe): delete the task at `row` and drop that row.
    pub fn delete_task(
        &mut self,
        row: usize,
        view: &mut impl TaskListView,
    ) -> ControllerResult<ListChange> {
        self.check_row(row)?;

        match self.store.delete(&self.tasks[row]) {
            Ok(_) => {
                let task = self.tasks.remove(row);
                view.delete_row(row);
                info!(
                    "event=task_delete module=service status=ok task_id={} row={row}",
                    task.id
                );
                Ok(ListChange::Removed { row, task })
            }
            Err(err) => {
                error!(
                    "event=task_delete module=service status=error task_id={} row={row} error={err}",
                    self.tasks[row].id
                );
                Err(err.into())
            }
        }
    }

    fn check_row(&self, row: usize) -> ControllerResult<()> {
        if row < self.tasks.len() {
            return Ok(());
        }
        error!(
            "event=row_lookup module=service status=error row={row} row_count={}",
            self.tasks.len()
        );
        Err(ControllerError::RowOutOfRange {
            row,
            row_count: self.tasks.len(),
        })
    }
}

fn accept_input(response: PromptResponse) -> Result<String, ListChange> {
    match response {
        PromptResponse::Cancel => Err(ListChange::Cancelled),
        PromptResponse::Save(text) if !is_valid_title(&text) => Err(ListChange::Discarded),
        PromptResponse::Save(text) => Ok(text),
    }
}
