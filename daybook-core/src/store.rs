//! TaskStore: the date -> tasks mapping and its persistence.
//!
//! Load once when the session starts, then write the whole mapping back after
//! every change. Storage problems never reach the caller: a bad or missing
//! blob loads as an empty mapping, and a failed write leaves the in-memory
//! state authoritative for the rest of the session.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::date_key::DateKey;
use crate::storage::{Storage, StorageError};
use crate::task::{Priority, Task, normalize_title};

/// Fixed key the mapping is stored under.
pub const STORAGE_KEY: &str = "dailyTasks.v1";

pub type TaskMap = BTreeMap<DateKey, Vec<Task>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("persisted tasks are not valid: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to serialize tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

pub struct TaskStore<S: Storage> {
    storage: S,
    tasks_by_date: TaskMap,
    selected: DateKey,
}

impl<S: Storage> TaskStore<S> {
    /// Empty store over `storage`, with today selected. Does not read storage.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks_by_date: TaskMap::new(),
            selected: DateKey::today(),
        }
    }

    /// Construct and load in one step; the usual way to start a session.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn tasks_by_date(&self) -> &TaskMap {
        &self.tasks_by_date
    }

    // ---- persistence ----

    /// Replace the in-memory mapping with whatever storage holds.
    pub fn try_load(&mut self) -> Result<(), StoreError> {
        let Some(raw) = self.storage.read(STORAGE_KEY)? else {
            self.tasks_by_date = TaskMap::new();
            return Ok(());
        };
        let map: TaskMap = serde_json::from_str(&raw).map_err(StoreError::Decode)?;
        self.tasks_by_date = map;
        Ok(())
    }

    /// Like [`try_load`](Self::try_load), but any failure means a fresh start.
    pub fn load(&mut self) {
        if let Err(e) = self.try_load() {
            warn!("starting with an empty task list: {e}");
            self.tasks_by_date = TaskMap::new();
        }
        debug!(dates = self.tasks_by_date.len(), "loaded tasks");
    }

    pub fn try_persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.tasks_by_date).map_err(StoreError::Encode)?;
        self.storage.write(STORAGE_KEY, &raw)?;
        Ok(())
    }

    /// Write the whole mapping. Failures are logged and otherwise ignored.
    pub fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!("could not save tasks, keeping in-memory state: {e}");
        }
    }

    // ---- selection ----

    pub fn selected_date(&self) -> DateKey {
        self.selected
    }

    /// View state only; never persisted.
    pub fn select_date(&mut self, date: DateKey) {
        self.selected = date;
    }

    pub fn selected_tasks(&self) -> &[Task] {
        self.get_tasks(self.selected)
    }

    // ---- queries ----

    pub fn get_tasks(&self, date: DateKey) -> &[Task] {
        self.tasks_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_task(&self, date: DateKey, id: &str) -> Option<&Task> {
        self.get_tasks(date).iter().find(|t| t.id == id)
    }

    /// Dates holding at least one task, ascending.
    pub fn dates(&self) -> Vec<DateKey> {
        self.tasks_by_date
            .iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(d, _)| *d)
            .collect()
    }

    // ---- mutations ----

    /// Prepend a new open task. Blank titles are ignored and yield `None`.
    pub fn add_task(&mut self, date: DateKey, title: &str, priority: Priority) -> Option<Task> {
        let Some(title) = normalize_title(title) else {
            debug!(%date, "ignoring blank title");
            return None;
        };

        let task = Task::new(title, priority);
        self.tasks_by_date
            .entry(date)
            .or_default()
            .insert(0, task.clone());
        debug!(%date, id = %task.id, "added task");
        self.persist();
        Some(task)
    }

    /// Flip `done`. Returns whether a task matched.
    pub fn toggle_task(&mut self, date: DateKey, id: &str) -> bool {
        self.update_with(date, id, |t| t.done = !t.done)
    }

    /// Returns whether a task was removed.
    pub fn remove_task(&mut self, date: DateKey, id: &str) -> bool {
        let Some(tasks) = self.tasks_by_date.get_mut(&date) else {
            return false;
        };
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            debug!(%date, id, "remove: no such task");
            return false;
        }
        debug!(%date, id, "removed task");
        self.persist();
        true
    }

    /// Same title rules as [`add_task`](Self::add_task): trimmed, blank is a no-op.
    pub fn update_task_title(&mut self, date: DateKey, id: &str, title: &str) -> bool {
        let Some(title) = normalize_title(title) else {
            debug!(%date, id, "ignoring blank title");
            return false;
        };
        self.update_with(date, id, move |t| t.title = title)
    }

    pub fn update_task_priority(&mut self, date: DateKey, id: &str, priority: Priority) -> bool {
        self.update_with(date, id, |t| t.priority = priority)
    }

    fn update_with(&mut self, date: DateKey, id: &str, apply: impl FnOnce(&mut Task)) -> bool {
        let found = self
            .tasks_by_date
            .get_mut(&date)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == id));
        let Some(task) = found else {
            debug!(%date, id, "update: no such task");
            return false;
        };
        apply(task);
        self.persist();
        true
    }
}
