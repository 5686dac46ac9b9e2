//! Generic in-memory table used by the repositories.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// A keyed table guarded by a read/write lock.
#[derive(Debug)]
pub struct Table<K, V> {
    rows: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Clone> Table<K, V> {
    pub fn insert(&self, key: K, value: V) {
        self.rows.write().unwrap().insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.rows.read().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.read().unwrap().contains_key(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.rows.write().unwrap().remove(key)
    }

    /// Mutate a row in place, returning the closure's result.
    pub fn with_mut<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.rows.write().unwrap().get_mut(key).map(f)
    }

    /// Snapshot of all rows matching the predicate.
    pub fn filtered(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.rows
            .read()
            .unwrap()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<V> {
        self.filtered(|_| true)
    }

    /// First row matching the predicate.
    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.rows
            .read()
            .unwrap()
            .values()
            .find(|v| predicate(v))
            .cloned()
    }
}
