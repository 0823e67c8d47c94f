//! String-keyed JSON document on disk.
//!
//! The terminal counterpart of browser local storage: one file holding a
//! JSON object, where each key maps to an arbitrary JSON value.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::FavoritesError;

/// Key-value document stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FavoritesError {
        FavoritesError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Read the whole document. A missing file is an empty document.
    fn read_document(&self) -> Result<Map<String, Value>, FavoritesError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(|e| FavoritesError::Parse {
            key: String::new(),
            message: e.to_string(),
        })
    }

    /// Write the whole document via a temporary file and rename.
    ///
    /// Creates parent directories if they don't exist.
    fn write_document(&self, document: &Map<String, Value>) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| FavoritesError::Parse {
            key: String::new(),
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    /// Get and decode the value stored under `key`.
    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FavoritesError> {
        let mut document = self.read_document()?;
        match document.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| FavoritesError::Parse {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// Encode and store `value` under `key`, keeping other keys intact.
    pub fn set_item<T: Serialize>(&self, key: &str, value: &T) -> Result<(), FavoritesError> {
        let value = serde_json::to_value(value).map_err(|e| FavoritesError::Parse {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }
}
