use std::collections::HashSet;

use tasklist_core::{Task, TaskId};
use tracing::{debug, error, info, warn};

use crate::{KeyValueStore, StoreResult, validate_key};

/// Key the task list is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "tasks";

/// Suffix of the key that records the highest id ever handed out.
const LAST_ID_SUFFIX: &str = "-last-id";

/// Reads and writes the task list as a JSON array under a single key.
///
/// The highest id ever minted is kept next to the list under
/// `<key>-last-id`, so ids of deleted or cleared tasks are not handed out
/// again after a restart.
///
/// The infallible [`load`](Self::load), [`save`](Self::save) and
/// [`clear`](Self::clear) log failures instead of returning them: the
/// in-memory list stays authoritative for the session.
#[derive(Debug, Clone)]
pub struct TaskPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TaskPersistence<S> {
    /// Persist under [`DEFAULT_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_KEY.to_owned(),
        }
    }

    /// Persist under a custom key.
    ///
    /// # Errors
    /// Returns an error if `key` is not a valid storage key.
    pub fn with_key(store: S, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self { store, key })
    }

    /// Key the list is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key the highest issued id is stored under.
    #[must_use]
    pub fn last_id_key(&self) -> String {
        format!("{}{LAST_ID_SUFFIX}", self.key)
    }

    /// Borrow the underlying medium.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the stored list. `Ok(None)` means nothing is stored.
    ///
    /// Records repeating an earlier id are dropped so ids stay unique.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be read or the value is not a task list.
    pub fn try_load(&self) -> StoreResult<Option<Vec<Task>>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw)?;
        let mut seen = HashSet::with_capacity(tasks.len());
        let total = tasks.len();
        let unique: Vec<Task> = tasks.into_iter().filter(|task| seen.insert(task.id)).collect();
        if unique.len() != total {
            warn!(key = %self.key, dropped = total - unique.len(), "Dropped tasks with duplicate ids");
        }
        Ok(Some(unique))
    }

    /// Serialize and write `tasks`.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn try_save(&self, tasks: &[Task]) -> StoreResult<()> {
        let encoded = serde_json::to_string(tasks)?;
        self.store.set(&self.key, &encoded)
    }

    /// Delete the stored entry.
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be removed.
    pub fn try_clear(&self) -> StoreResult<()> {
        self.store.remove(&self.key)
    }

    /// Read the highest id issued so far. `Ok(None)` means none is recorded.
    ///
    /// # Errors
    /// Returns an error if the medium cannot be read or the value is not an id.
    pub fn try_load_last_id(&self) -> StoreResult<Option<TaskId>> {
        let Some(raw) = self.store.get(&self.last_id_key())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Record `id` as the highest id issued so far.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn try_save_last_id(&self, id: TaskId) -> StoreResult<()> {
        let encoded = serde_json::to_string(&id)?;
        self.store.set(&self.last_id_key(), &encoded)
    }

    /// Read the stored list, treating absent or unreadable data as empty.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(Some(tasks)) => {
                info!(key = %self.key, count = tasks.len(), "Loaded tasks");
                tasks
            }
            Ok(None) => {
                debug!(key = %self.key, "No stored tasks");
                Vec::new()
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Ignoring unreadable stored tasks");
                Vec::new()
            }
        }
    }

    /// Write `tasks`, logging instead of failing.
    pub fn save(&self, tasks: &[Task]) {
        match self.try_save(tasks) {
            Ok(()) => debug!(key = %self.key, count = tasks.len(), "Saved tasks"),
            Err(err) => error!(key = %self.key, error = %err, "Failed to save tasks"),
        }
    }

    /// Read the highest issued id, treating absent or unreadable data as none.
    pub fn load_last_id(&self) -> Option<TaskId> {
        match self.try_load_last_id() {
            Ok(last) => last,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Ignoring unreadable last task id");
                None
            }
        }
    }

    /// Record the highest issued id, logging instead of failing.
    pub fn save_last_id(&self, id: TaskId) {
        if let Err(err) = self.try_save_last_id(id) {
            error!(key = %self.key, %id, error = %err, "Failed to save last task id");
        }
    }

    /// Delete the stored list, logging instead of failing.
    ///
    /// The last-id record is kept.
    pub fn clear(&self) {
        match self.try_clear() {
            Ok(()) => info!(key = %self.key, "Cleared stored tasks"),
            Err(err) => error!(key = %self.key, error = %err, "Failed to clear stored tasks"),
        }
    }
}
