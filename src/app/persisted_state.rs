// SPDX-License-Identifier: MPL-2.0
//! File-backed [`StateStore`] using CBOR format.
//!
//! This is the desktop/CLI counterpart of the browser's `localStorage`: the
//! unmute session flag and preferred volume survive across runs in a small
//! CBOR map inside the application data directory.
//!
//! # Path Resolution
//!
//! The state file location can be customized for testing or portable deployments:
//! 1. Use [`FileStore::open_in`] with an explicit directory
//! 2. Set `VIBEDRIPS_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::error::{Error, Result};
use crate::media_state::StateStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// State file name within the app data directory.
const STATE_FILE: &str = "media-state.cbor";

/// Key/value store persisted to a CBOR file after every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store in the default data directory.
    ///
    /// Returns the store and an optional i18n warning key when existing
    /// state could not be read (the store then starts empty).
    pub fn open() -> Option<(Self, Option<String>)> {
        let dir = paths::get_app_data_dir()?;
        Some(Self::open_in(&dir))
    }

    /// Opens the store in `dir`. Missing files start empty without warning.
    pub fn open_in(dir: &Path) -> (Self, Option<String>) {
        let path = dir.join(STATE_FILE);
        let (entries, warning) = match Self::read_entries(&path) {
            Ok(entries) => (entries, None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable media state");
                (
                    BTreeMap::new(),
                    Some("notification-state-parse-error".to_string()),
                )
            }
        };
        (
            Self {
                path,
                entries: RefCell::new(entries),
            },
            warning,
        )
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let reader = BufReader::new(fs::File::open(path)?);
        ciborium::from_reader(reader).map_err(|err| Error::State(err.to_string()))
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(fs::File::create(&self.path)?);
        ciborium::into_writer(&*self.entries.borrow(), writer)
            .map_err(|err| Error::State(err.to_string()))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }
}
