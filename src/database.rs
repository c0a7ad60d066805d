//! A named set of collections backed by one on-disk snapshot file
//!.

use crate::collection::Collection;
use crate::document::Document;
use crate::errors::{EnoError, Result};
use crate::index::Index;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk shape of one collection: `{name, documents: {id -> document},
/// indexes: {field -> index}}`.
#[derive(Serialize, Deserialize)]
struct CollectionSnapshot {
    name: String,
    documents: BTreeMap<String, Document>,
    indexes: BTreeMap<String, Index>,
}

/// On-disk shape of a whole database: `{name, collections, path}`.
#[derive(Serialize, Deserialize)]
struct DatabaseSnapshot {
    name: String,
    collections: BTreeMap<String, CollectionSnapshot>,
    path: PathBuf,
}

/// `name`, `collections: mapping from name to Collection`, `path`. Owns
/// a reader-writer lock over the collections registry; each
/// `Collection` underneath owns its own lock, so a read lock here plus
/// the per-collection lock is the only locking a read-only operation
/// ever needs.
pub struct Database {
    name: String,
    path: PathBuf,
    collections: RwLock<BTreeMap<String, Arc<Collection>>>,
}

impl Database {
    #[must_use]
    pub fn empty(name: impl Into<String>, path: PathBuf) -> Self {
        Database { name: name.into(), path, collections: RwLock::new(BTreeMap::new()) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites `name` and `path` in place, used by backup restore to
    /// install a snapshot under a new database name. Fails with
    /// `InvalidArgument` if `new_name` is empty or blank.
    pub(crate) fn rename(&mut self, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(EnoError::InvalidArgument("database name must not be empty".to_string()));
        }
        self.name = new_name.to_string();
        self.path.set_file_name(format!("{new_name}.enosql"));
        Ok(())
    }

    /// Fails with `InvalidArgument` if `name` is empty or blank, with
    /// `AlreadyExists` if the collection is already present.
    pub fn create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        if name.trim().is_empty() {
            return Err(EnoError::InvalidArgument("collection name must not be empty".to_string()));
        }
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(EnoError::AlreadyExists(format!("collection {name} in database {}", self.name)));
        }
        let collection = Arc::new(Collection::new(name));
        collections.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection)
    }

    #[must_use]
    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    /// Creates the collection on first reference if it is missing,
    /// mirroring `create_collection=true` import semantics. Fails with
    /// `InvalidArgument` if `name` is empty or blank.
    pub fn get_or_create_collection(&self, name: &str) -> Result<Arc<Collection>> {
        if let Some(existing) = self.get_collection(name) {
            return Ok(existing);
        }
        if name.trim().is_empty() {
            return Err(EnoError::InvalidArgument("collection name must not be empty".to_string()));
        }
        let mut collections = self.collections.write();
        Ok(collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new(name)))
            .clone())
    }

    pub fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.remove(name).is_none() {
            return Err(EnoError::NotFound(format!("collection {name} in database {}", self.name)));
        }
        Ok(())
    }

    #[must_use]
    pub fn list_collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// Rebuilds every index of every collection; used by compaction
    ///.
    pub fn rebuild_all_indexes(&self) {
        for collection in self.collections.read().values() {
            collection.rebuild_indexes();
        }
    }

    /// Serializes the current state under a read lock; the caller is
    /// responsible for writing the bytes.
    pub(crate) fn to_snapshot(&self) -> DatabaseSnapshotOwned {
        let collections = self.collections.read();
        let mut out = BTreeMap::new();
        for (name, collection) in collections.iter() {
            let (documents, indexes) = collection.snapshot();
            out.insert(name.clone(), CollectionSnapshot { name: name.clone(), documents, indexes });
        }
        DatabaseSnapshotOwned(DatabaseSnapshot { name: self.name.clone(), collections: out, path: self.path.clone() })
    }

    pub(crate) fn from_bytes(bytes: &[u8], path: PathBuf) -> Result<Self> {
        let snapshot: DatabaseSnapshot = serde_json::from_slice(bytes)?;
        let mut collections = BTreeMap::new();
        for (name, snap) in snapshot.collections {
            collections.insert(name.clone(), Arc::new(Collection::from_snapshot(name, snap.documents, snap.indexes)));
        }
        Ok(Database { name: snapshot.name, path, collections: RwLock::new(collections) })
    }
}

/// Opaque wrapper so callers outside this module serialize a snapshot
/// without reaching into its private fields.
pub(crate) struct DatabaseSnapshotOwned(DatabaseSnapshot);

impl DatabaseSnapshotOwned {
    pub(crate) fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}
