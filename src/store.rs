// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Durable key-value persistence for the seen-set and the filter settings.
//!
//! Values are JSON strings. Reads are lenient: a missing or unparseable value
//! means "use the default", and a corrupt record never stops the program.

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::Fallible;
use crate::types::filter_config::FilterConfig;
use crate::types::quote::QuoteId;
use crate::types::timestamp::Timestamp;

/// Key holding the JSON array of seen quote ids.
pub const SEEN_KEY: &str = "seen-quotes";

/// Key holding the JSON object of filter toggles.
pub const FILTERS_KEY: &str = "quote-filters";

/// A string-to-string store that outlives the process.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Fallible<Option<String>>;

    /// Overwrite the value for `key`. A subsequent `get` sees either the old
    /// or the new value, never a partial one.
    fn set(&mut self, key: &str, value: &str) -> Fallible<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Fallible<()>;
}

/// A key-value store backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(database_path: &Path) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating key-value schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from kv where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        let sql = "insert into kv (key, value, updated_at) values (?, ?, ?) on conflict (key) do update set value = excluded.value, updated_at = excluded.updated_at;";
        self.conn.execute(sql, (key, value, Timestamp::now()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Fallible<()> {
        self.conn.execute("delete from kv where key = ?;", [key])?;
        Ok(())
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["kv"], |row| row.get(0))?;
    Ok(count > 0)
}

/// An in-process store. Used when the database is unavailable, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Fallible<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Typed access to the seen-set and filter records of a key-value store.
pub struct Store {
    backend: Box<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Load the seen-set. Absent, unreadable, or corrupt records yield an
    /// empty set.
    pub fn load_seen(&self) -> HashSet<QuoteId> {
        match self.read_json::<Vec<QuoteId>>(SEEN_KEY) {
            Some(ids) => ids.into_iter().collect(),
            None => HashSet::new(),
        }
    }

    /// Overwrite the persisted seen-set.
    pub fn persist_seen(&mut self, seen: &HashSet<QuoteId>) -> Fallible<()> {
        let mut ids: Vec<&QuoteId> = seen.iter().collect();
        ids.sort();
        let json = serde_json::to_string(&ids)?;
        self.backend.set(SEEN_KEY, &json)
    }

    /// Remove the persisted seen-set entirely.
    pub fn clear_seen(&mut self) -> Fallible<()> {
        self.backend.remove(SEEN_KEY)
    }

    /// Load the filter settings, falling back to the defaults.
    pub fn load_filters(&self) -> FilterConfig {
        self.read_json::<FilterConfig>(FILTERS_KEY).unwrap_or_default()
    }

    pub fn save_filters(&mut self, config: &FilterConfig) -> Fallible<()> {
        let json = serde_json::to_string(config)?;
        self.backend.set(FILTERS_KEY, &json)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read `{key}`, using defaults: {e}");
                return None;
            }
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring corrupt `{key}` record: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::types::quote::SourceCollection;

    fn ids(items: &[(SourceCollection, usize)]) -> HashSet<QuoteId> {
        items
            .iter()
            .map(|(source, index)| QuoteId::new(*source, *index))
            .collect()
    }

    #[test]
    fn test_sqlite_get_set_remove() -> Fallible<()> {
        let dir = tempdir()?;
        let mut store = SqliteStore::new(&dir.path().join("test.db"))?;
        assert_eq!(store.get("a")?, None);
        store.set("a", "1")?;
        assert_eq!(store.get("a")?, Some("1".to_string()));
        store.set("a", "2")?;
        assert_eq!(store.get("a")?, Some("2".to_string()));
        store.remove("a")?;
        assert_eq!(store.get("a")?, None);
        store.remove("a")?;
        Ok(())
    }

    #[test]
    fn test_sqlite_reopen_keeps_values() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        {
            let mut store = SqliteStore::new(&path)?;
            store.set("k", "v")?;
        }
        let store = SqliteStore::new(&path)?;
        assert_eq!(store.get("k")?, Some("v".to_string()));
        Ok(())
    }

    #[test]
    fn test_seen_round_trip() -> Fallible<()> {
        let mut store = Store::new(MemoryStore::new());
        assert!(store.load_seen().is_empty());
        let seen = ids(&[(SourceCollection::V1, 2), (SourceCollection::V2, 0)]);
        store.persist_seen(&seen)?;
        assert_eq!(store.load_seen(), seen);
        store.clear_seen()?;
        assert!(store.load_seen().is_empty());
        Ok(())
    }

    #[test]
    fn test_seen_is_stored_as_sorted_json_array() -> Fallible<()> {
        let mut store = Store::new(MemoryStore::new());
        let seen = ids(&[(SourceCollection::V2, 1), (SourceCollection::V1, 0)]);
        store.persist_seen(&seen)?;
        let raw = store.backend.get(SEEN_KEY)?;
        assert_eq!(raw, Some(r#"["v1-0","v2-1"]"#.to_string()));
        Ok(())
    }

    #[test]
    fn test_corrupt_seen_is_empty() -> Fallible<()> {
        let mut backend = MemoryStore::new();
        backend.set(SEEN_KEY, "{not json")?;
        let store = Store::new(backend);
        assert!(store.load_seen().is_empty());
        Ok(())
    }

    #[test]
    fn test_wrong_shape_seen_is_empty() -> Fallible<()> {
        let mut backend = MemoryStore::new();
        backend.set(SEEN_KEY, r#"{"v1-0": true}"#)?;
        let store = Store::new(backend);
        assert!(store.load_seen().is_empty());
        Ok(())
    }

    #[test]
    fn test_filters_default_and_round_trip() -> Fallible<()> {
        let mut store = Store::new(MemoryStore::new());
        assert_eq!(store.load_filters(), FilterConfig::default());
        let config = FilterConfig {
            exclude_v1: false,
            exclude_flagged: true,
        };
        store.save_filters(&config)?;
        assert_eq!(store.load_filters(), config);
        Ok(())
    }

    #[test]
    fn test_corrupt_filters_are_defaults() -> Fallible<()> {
        let mut backend = MemoryStore::new();
        backend.set(FILTERS_KEY, "[1, 2, 3]")?;
        let store = Store::new(backend);
        assert_eq!(store.load_filters(), FilterConfig::default());
        Ok(())
    }
}
