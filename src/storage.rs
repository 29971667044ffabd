//! Storage layer for tasklist
//!
//! Persistent state is an opaque key-value string store. Each key lives in
//! its own file under the store root:
//!
//! ```text
//! <data dir>/                   # platform data dir or --data-dir
//!   tasklist.toml               # optional configuration
//!   tasklist.log                # TUI log output
//!   tasks.json                  # value stored under the "tasks" key
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// File extension used for stored values
pub const VALUE_EXTENSION: &str = "json";

/// Synchronous string key-value store.
///
/// `get` returns `None` for absent keys, `set` overwrites unconditionally and
/// `remove` of an absent key succeeds.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Check that a key can be mapped onto a single file name
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "storage key cannot be empty".to_string(),
        ));
    }
    if key.starts_with('.') {
        return Err(Error::InvalidArgument(format!(
            "storage key '{key}' cannot start with '.'"
        )));
    }
    if key.contains(['/', '\\']) || key.contains('\0') {
        return Err(Error::InvalidArgument(format!(
            "storage key '{key}' cannot contain path separators"
        )));
    }
    Ok(())
}

/// File-backed store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Directory holding the stored values
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }

    /// Write data atomically (temp file in the same directory, then rename)
    ///
    /// Readers see either the previous value or the new one, never a
    /// truncated file.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| {
            Error::OperationFailed(format!("failed to replace {}: {}", path.display(), err.error))
        })?;

        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            // Non UTF-8 bytes are still a stored value; hand it on as text so
            // the caller's decode step can reject it.
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                let bytes = fs::read(&path)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        self.write_atomic(&path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-process store with no disk state
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Resolve the data directory: explicit override, else the platform data dir
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    ProjectDirs::from("", "", "tasklist")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::DataDirUnavailable(PathBuf::from("<home>")))
}

/// Path to the configuration file inside a data directory
pub fn config_file(data_dir: &Path) -> PathBuf {
    data_dir.join("tasklist.toml")
}

/// Path to the TUI log file inside a data directory
pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join("tasklist.log")
}
