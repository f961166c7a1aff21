//! JSON file backed store
//!
//! All keys live in one JSON object on disk. Every `save` rewrites the file
//! through a temp file and rename, so a crash mid-write leaves the previous
//! save intact.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ProgressionStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read/write save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a save file; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::info!("Opened save file {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    /// Open a save file, starting fresh if it is unreadable
    pub fn open_or_fresh(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("{err}; starting with an empty save");
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every key to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let text = serde_json::to_string_pretty(&self.values).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }
        Ok(())
    }
}

impl ProgressionStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            log::warn!("Could not persist '{key}': {err}");
        }
    }
}
