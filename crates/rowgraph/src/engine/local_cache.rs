use rowgraph_core::stmt::{Fingerprint, Value};

use std::collections::HashMap;

/// A session's query results, keyed by the statement's cache key.
#[derive(Debug, Default)]
pub(crate) struct LocalCache {
    entries: HashMap<Fingerprint, CacheEntry>,
}

#[derive(Debug, Clone)]
pub(crate) enum CacheEntry {
    /// The statement is running; its rows are not available yet.
    Placeholder,

    Loaded(Vec<Value>),
}

impl LocalCache {
    pub(crate) fn get(&self, key: &Fingerprint) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns the cached rows, if the statement has completed.
    pub(crate) fn loaded(&self, key: &Fingerprint) -> Option<&[Value]> {
        match self.entries.get(key)? {
            CacheEntry::Loaded(rows) => Some(rows),
            CacheEntry::Placeholder => None,
        }
    }

    pub(crate) fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn put_placeholder(&mut self, key: Fingerprint) {
        self.entries.insert(key, CacheEntry::Placeholder);
    }

    pub(crate) fn put(&mut self, key: Fingerprint, rows: Vec<Value>) {
        self.entries.insert(key, CacheEntry::Loaded(rows));
    }

    pub(crate) fn remove(&mut self, key: &Fingerprint) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
