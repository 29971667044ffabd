//! Task records and their persistence.
//!
//! The whole list is stored as one JSON array under a single key and is
//! overwritten in full after every mutation.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::KvStore;

/// Default key the task list is stored under
pub const STORAGE_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// New incomplete task
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Reads and writes the full task list through a [`KvStore`]
#[derive(Debug)]
pub struct TaskRepository<S: KvStore> {
    store: S,
    key: String,
}

impl<S: KvStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize the full sequence and overwrite the stored value
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        self.store.set(&self.key, &json)?;
        tracing::debug!(key = %self.key, count = tasks.len(), "saved task list");
        Ok(())
    }

    /// Load the stored list.
    ///
    /// An absent value is an empty list. A value that does not decode as a
    /// task list is logged, removed from the store and treated as empty.
    /// Only store I/O failures are returned as errors.
    pub fn load(&self) -> Result<Vec<Task>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let decoded: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "stored task list is corrupted; discarding it");
                if let Err(remove_err) = self.store.remove(&self.key) {
                    tracing::warn!(key = %self.key, error = %remove_err, "failed to remove corrupted task list");
                }
                return Ok(Vec::new());
            }
        };

        let total = decoded.len();
        let tasks: Vec<Task> = decoded
            .into_iter()
            .filter(|task| !task.text.trim().is_empty())
            .collect();
        if tasks.len() != total {
            tracing::warn!(
                key = %self.key,
                skipped = total - tasks.len(),
                "skipped stored tasks without text"
            );
        }
        Ok(tasks)
    }

    /// Remove the stored list entirely
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }
}
