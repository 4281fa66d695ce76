// SPDX-License-Identifier: MPL-2.0
//! Key/value persistence behind [`MediaState`](super::MediaState).
//!
//! Stores take `&self` like the browser's `localStorage`: the crate runs on a
//! single event loop and writes are simple last-write-wins sets.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// String key/value store with `localStorage` semantics.
pub trait StateStore {
    /// Returns the stored value, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, used in tests and when no data directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RefCell::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
