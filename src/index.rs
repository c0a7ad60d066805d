//! Per-field secondary index.
//!
//! The default is a last-writer-wins map from stringified field value
//! to a single document id — [`IndexKind::Unique`] — for fields that
//! aren't actually unique, this crate additionally offers
//! [`IndexKind::Multi`], which keeps every matching id instead of
//! overwriting. `Unique` remains the default so existing last-writer-
//! wins callers see unchanged behavior.

use crate::value::{stringify, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Unique,
    Multi,
}

impl Default for IndexKind {
    fn default() -> Self {
        IndexKind::Unique
    }
}

/// One entry's id set: exactly one id for `Unique`, any number for `Multi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexEntry {
    One(String),
    Many(Vec<String>),
}

impl IndexEntry {
    fn ids(&self) -> Vec<&str> {
        match self {
            IndexEntry::One(id) => vec![id.as_str()],
            IndexEntry::Many(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

/// `field: string`, `entries: stringified value -> id(s)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub field: String,
    #[serde(default)]
    pub kind: IndexKind,
    pub values: BTreeMap<String, IndexEntry>,
}

impl Index {
    #[must_use]
    pub fn new(field: impl Into<String>, kind: IndexKind) -> Self {
        Index { field: field.into(), kind, values: BTreeMap::new() }
    }

    /// Registers `id` under `value`'s stringification. `Unique` indexes
    /// overwrite any prior id for the same key (last-writer-wins);
    /// `Multi` indexes accumulate.
    pub fn insert(&mut self, value: &Value, id: &str) {
        let key = stringify(value);
        match self.kind {
            IndexKind::Unique => {
                self.values.insert(key, IndexEntry::One(id.to_string()));
            }
            IndexKind::Multi => {
                self.values
                    .entry(key)
                    .and_modify(|e| {
                        let mut ids: Vec<String> = e.ids().into_iter().map(str::to_string).collect();
                        if !ids.iter().any(|existing| existing == id) {
                            ids.push(id.to_string());
                        }
                        *e = IndexEntry::Many(ids);
                    })
                    .or_insert_with(|| IndexEntry::One(id.to_string()));
            }
        }
    }

    /// Removes `id`'s contribution under `value`'s stringification, only
    /// if the entry currently names `id` (guards against removing a
    /// fresher writer's entry for a `Unique` index).
    pub fn remove(&mut self, value: &Value, id: &str) {
        let key = stringify(value);
        let Some(entry) = self.values.get(&key) else { return };
        match entry {
            IndexEntry::One(existing) => {
                if existing == id {
                    self.values.remove(&key);
                }
            }
            IndexEntry::Many(ids) => {
                let remaining: Vec<String> =
                    ids.iter().filter(|existing| existing.as_str() != id).cloned().collect();
                if remaining.is_empty() {
                    self.values.remove(&key);
                } else {
                    self.values.insert(key, IndexEntry::Many(remaining));
                }
            }
        }
    }

    /// O(1) lookup of every id registered under `value`'s stringification.
    #[must_use]
    pub fn lookup(&self, value: &Value) -> Vec<String> {
        let key = stringify(value);
        self.values.get(&key).map(|e| e.ids().into_iter().map(str::to_string).collect()).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_index_last_writer_wins() {
        let mut idx = Index::new("qty", IndexKind::Unique);
        idx.insert(&Value::Int(3), "a");
        idx.insert(&Value::Int(3), "c");
        assert_eq!(idx.lookup(&Value::Int(3)), vec!["c".to_string()]);
    }

    #[test]
    fn multi_index_accumulates() {
        let mut idx = Index::new("qty", IndexKind::Multi);
        idx.insert(&Value::Int(3), "a");
        idx.insert(&Value::Int(3), "c");
        let mut ids = idx.lookup(&Value::Int(3));
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn remove_only_drops_matching_id() {
        let mut idx = Index::new("qty", IndexKind::Unique);
        idx.insert(&Value::Int(3), "a");
        idx.insert(&Value::Int(3), "c");
        idx.remove(&Value::Int(3), "a");
        assert_eq!(idx.lookup(&Value::Int(3)), vec!["c".to_string()]);
    }
}
