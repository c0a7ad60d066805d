//! Registry of databases rooted at a data directory; snapshot load/save.
//! The `Engine` is the crate's top-level handle: callers obtain a
//! `Database` from it, a `Collection` from the `Database`, and invoke
//! operations on the `Collection`.

use crate::config::EngineConfig;
use crate::database::Database;
use crate::errors::{EnoError, Result};
use crate::stats::DatabaseStats;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FILE_EXTENSION: &str = "enosql";

/// `data_dir`, `databases: mapping from name to Database`. The
/// in-memory map is a cache of (a subset of) on-disk databases; an
/// on-disk database not yet loaded is still discoverable via
/// `list_databases`/`get_database`.
pub struct Engine {
    data_dir: PathBuf,
    databases: RwLock<BTreeMap<String, Arc<Database>>>,
}

impl Engine {
    /// Builds an `Engine` rooted at `config.data_dir`, creating the
    /// directory if missing. `Engine::new` is the common-case
    /// convenience wrapper.
    pub fn open(config: EngineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        Ok(Engine { data_dir: config.data_dir, databases: RwLock::new(BTreeMap::new()) })
    }

    /// Convenience constructor equivalent to `Engine::open(EngineConfig::new(data_dir))`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Engine::open(EngineConfig::new(data_dir.into()))
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{FILE_EXTENSION}"))
    }

    /// Fails with `AlreadyExists` if `name` is already registered in
    /// memory; otherwise creates an empty database and persists it
    /// immediately.
    pub fn create_database(&self, name: &str) -> Result<Arc<Database>> {
        if name.trim().is_empty() {
            return Err(EnoError::InvalidArgument("database name must not be empty".to_string()));
        }
        let mut databases = self.databases.write();
        if databases.contains_key(name) {
            return Err(EnoError::AlreadyExists(format!("database {name}")));
        }
        let db = Arc::new(Database::empty(name, self.path_for(name)));
        write_snapshot(&db)?;
        databases.insert(name.to_string(), Arc::clone(&db));
        log::info!("created database {name}");
        crate::logger::audit("create_database", name);
        Ok(db)
    }

    /// Returns the cached handle if loaded; otherwise reads and parses
    /// the file, installs it into the cache, and returns it. Fails with
    /// `NotFound` if neither the cache nor the file has it.
    pub fn get_database(&self, name: &str) -> Result<Arc<Database>> {
        if let Some(db) = self.databases.read().get(name).cloned() {
            return Ok(db);
        }
        let path = self.path_for(name);
        if !path.exists() {
            return Err(EnoError::NotFound(format!("database {name}")));
        }
        let bytes = std::fs::read(&path)?;
        let db = Arc::new(Database::from_bytes(&bytes, path)?);
        let mut databases = self.databases.write();
        // Another thread may have loaded it first; prefer the winner so every
        // caller converges on one in-memory handle.
        let db = databases.entry(name.to_string()).or_insert(db).clone();
        Ok(db)
    }

    /// Serializes the current in-memory state under a database read
    /// lock and atomically replaces the file.
    pub fn save_database(&self, name: &str) -> Result<()> {
        let db = self.get_database(name)?;
        write_snapshot(&db)?;
        log::info!("saved database {name}");
        crate::logger::audit("save_database", name);
        Ok(())
    }

    /// Removes the in-memory entry and the on-disk file. A missing file
    /// is not an error.
    pub fn delete_database(&self, name: &str) -> Result<()> {
        self.databases.write().remove(name);
        let path = self.path_for(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        log::info!("deleted database {name}");
        crate::logger::audit("delete_database", name);
        Ok(())
    }

    /// Union of in-memory names and `*.enosql` basenames on disk,
    /// deduplicated.
    pub fn list_databases(&self) -> Result<Vec<String>> {
        let mut names: BTreeMap<String, ()> =
            self.databases.read().keys().map(|k| (k.clone(), ())).collect();
        if self.data_dir.exists() {
            for entry in std::fs::read_dir(&self.data_dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION)
                    && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                {
                    names.insert(stem.to_string(), ());
                }
            }
        }
        Ok(names.into_keys().collect())
    }

    /// Rebuilds every index of every collection in `name`, then
    /// persists the repaired database.
    pub fn compact_database(&self, name: &str) -> Result<()> {
        let db = self.get_database(name)?;
        db.rebuild_all_indexes();
        write_snapshot(&db)?;
        log::info!("compacted database {name}");
        crate::logger::audit("compact_database", name);
        Ok(())
    }

    /// Walks every collection of `name` and computes `DatabaseStats`
    ///.
    pub fn get_database_stats(&self, name: &str) -> Result<DatabaseStats> {
        let db = self.get_database(name)?;
        Ok(DatabaseStats::compute(&db))
    }

    /// Installs an already-constructed `Database` into the registry
    /// (used by restore), overwriting any prior in-memory handle of the
    /// same name, then persists it immediately.
    pub(crate) fn install_database(&self, db: Database) -> Result<Arc<Database>> {
        let name = db.name().to_string();
        let db = Arc::new(db);
        write_snapshot(&db)?;
        self.databases.write().insert(name, Arc::clone(&db));
        Ok(db)
    }
}

/// Writes a whole-file snapshot via a temp-file-then-rename, so
/// concurrent readers never observe a partially-written file.
pub(crate) fn write_snapshot(db: &Database) -> Result<()> {
    let json = db.to_snapshot().to_pretty_json()?;
    let path = db.path();
    let tmp_path = path.with_extension("enosql.tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_list_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(dir.path()).unwrap();
        let db = engine.create_database("shop").unwrap();
        db.create_collection("items").unwrap();
        engine.save_database("shop").unwrap();

        assert_eq!(engine.list_databases().unwrap(), vec!["shop".to_string()]);
        assert!(matches!(engine.create_database("shop"), Err(EnoError::AlreadyExists(_))));

        let reopened = Engine::new(dir.path()).unwrap();
        let loaded = reopened.get_database("shop").unwrap();
        assert!(loaded.get_collection("items").is_some());

        engine.delete_database("shop").unwrap();
        assert!(engine.list_databases().unwrap().is_empty());
    }

    #[test]
    fn get_database_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(dir.path()).unwrap();
        assert!(matches!(engine.get_database("nope"), Err(EnoError::NotFound(_))));
    }

    #[test]
    fn compact_rebuilds_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(dir.path()).unwrap();
        let db = engine.create_database("shop").unwrap();
        let items = db.create_collection("items").unwrap();
        items.insert("a", Default::default()).unwrap();
        items.create_index("qty", crate::index::IndexKind::Unique);
        engine.compact_database("shop").unwrap();
        assert_eq!(items.index_names(), vec!["qty".to_string()]);
    }
}
