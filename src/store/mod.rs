//! Flat-file user store
//!
//! Users are kept as a single JSON array in one file:
//! - Reads return an empty collection when the file is absent, unreadable
//!   or not an array
//! - Every append rewrites the whole file, pretty-printed with a
//!   4-space indent
//!
//! Writes are not atomic and not crash-safe.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use thiserror::Error;

/// Store write errors. Read errors are never surfaced.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode users: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// JSON-array user collection backed by a single file.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all stored users, degrading to an empty collection on any error.
    pub fn load(&self) -> Vec<Value> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "user store unreadable");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(users)) => users,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "user store is not a JSON array");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "user store is not valid JSON");
                Vec::new()
            }
        }
    }

    /// Overwrites the file with the given collection.
    pub fn save(&self, users: &[Value]) -> StoreResult<()> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        users.serialize(&mut ser)?;

        fs::write(&self.path, buf).map_err(|source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Appends one serialized user and rewrites the file.
    ///
    /// Returns the number of stored users after the append.
    pub fn append(&self, user: Value) -> StoreResult<usize> {
        let mut users = self.load();
        users.push(user);
        self.save(&users)?;
        tracing::info!(path = %self.path.display(), total = users.len(), "user appended");
        Ok(users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, UserStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("users.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_temp_dir, store) = setup_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let (_temp_dir, store) = setup_store();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), r#"{"name": "not an array"}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_accumulates() {
        let (_temp_dir, store) = setup_store();
        assert_eq!(store.append(json!({ "name": "Alice" })).unwrap(), 1);
        assert_eq!(store.append(json!({ "name": "Bob" })).unwrap(), 2);

        let users = store.load();
        assert_eq!(users[0]["name"], "Alice");
        assert_eq!(users[1]["name"], "Bob");
    }

    #[test]
    fn test_append_over_corrupt_file_starts_fresh() {
        let (_temp_dir, store) = setup_store();
        fs::write(store.path(), "garbage").unwrap();
        assert_eq!(store.append(json!({ "name": "Alice" })).unwrap(), 1);
    }

    #[test]
    fn test_four_space_indent() {
        let (_temp_dir, store) = setup_store();
        store.save(&[json!({ "name": "Alice" })]).unwrap();
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "[\n    {\n        \"name\": \"Alice\"\n    }\n]");
    }

    #[test]
    fn test_write_failure_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = UserStore::new(temp_dir.path().join("missing_dir").join("users.json"));
        let err = store.save(&[]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
