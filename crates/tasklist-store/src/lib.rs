//! Local key-value persistence for tasklist.
//!
//! [`KeyValueStore`] is the storage medium; [`TaskPersistence`] layers the
//! task-list encoding and the best-effort load/save/clear policy on top.

pub mod error;
mod file;
mod memory;
mod persistence;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persistence::{DEFAULT_KEY, TaskPersistence};

/// String-keyed storage of string values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns a store-specific error when the medium cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the entry under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns a store-specific error when the entry exists but cannot be removed.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Check that `key` is usable by every store, including as a file name.
///
/// # Errors
/// Returns [`StoreError::InvalidKey`] for empty keys or keys containing
/// characters outside `[A-Za-z0-9_-]`.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
