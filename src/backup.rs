//! Compressed archive writer/reader for backup/restore: a
//! gzip-compressed POSIX tar containing exactly the database's JSON
//! snapshot plus a small metadata member.

use crate::database::Database;
use crate::engine::Engine;
use crate::errors::{EnoError, Result};
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const ARCHIVE_VERSION: &str = "1.0";

/// `{database, backup, timestamp, version}`, the sole contents of a
/// backup archive's `metadata.json` member.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArchiveMetadata {
    database: String,
    backup: String,
    timestamp: String,
    version: String,
}

/// Returned by `create_backup` and `list_backups`: everything a caller
/// needs to locate and describe one archive without re-reading it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub name: String,
    pub database: String,
    pub timestamp: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

fn archive_file_name(db_name: &str, backup_name: &str, now: chrono::DateTime<Utc>) -> String {
    format!("{db_name}_{backup_name}_{}.tar.gz", now.format("%Y%m%d_%H%M%S"))
}

/// Serializes `db_name` as JSON, wraps it with `metadata.json` in a
/// gzip-compressed tar, and writes it to `{backup_dir}/{db}_{backup_name}_{timestamp}.tar.gz`
///.
pub fn create_backup(engine: &Engine, db_name: &str, backup_name: &str, backup_dir: &Path) -> Result<BackupInfo> {
    let db = engine.get_database(db_name)?;
    std::fs::create_dir_all(backup_dir)?;

    let now = Utc::now();
    let snapshot_json = db.to_snapshot().to_pretty_json()?;
    let metadata = ArchiveMetadata {
        database: db_name.to_string(),
        backup: backup_name.to_string(),
        timestamp: now.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
        version: ARCHIVE_VERSION.to_string(),
    };
    let metadata_json = serde_json::to_vec_pretty(&metadata)?;

    let archive_path = backup_dir.join(archive_file_name(db_name, backup_name, now));
    let file = std::fs::File::create(&archive_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_member(&mut builder, &format!("{db_name}.enosql"), snapshot_json.as_bytes())?;
    append_member(&mut builder, "metadata.json", &metadata_json)?;
    builder.into_inner()?.finish()?;

    let size_bytes = std::fs::metadata(&archive_path)?.len();
    log::info!("created backup {} for database {db_name}", archive_path.display());
    crate::logger::audit("create_backup", db_name);
    Ok(BackupInfo { name: backup_name.to_string(), database: db_name.to_string(), timestamp: metadata.timestamp, size_bytes, path: archive_path })
}

fn append_member<W: std::io::Write>(builder: &mut tar::Builder<W>, name: &str, bytes: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, bytes)?;
    Ok(())
}

/// Reads both members of `archive_path`, parses the database JSON,
/// rewrites `name`/`path` to `new_db_name` rooted at `engine`'s data
/// directory, reinitializes per-collection locks implicitly (a fresh
/// `Database` is constructed from the parsed snapshot), installs it
/// into the engine, and persists it. Fails with `Malformed`
/// if no `.enosql` member is present.
pub fn restore_backup(engine: &Engine, archive_path: &Path, new_db_name: &str) -> Result<Arc<Database>> {
    let file = std::fs::File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    let mut snapshot_bytes: Option<Vec<u8>> = None;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_path_buf();
        let is_snapshot = path.extension().and_then(|e| e.to_str()) == Some("enosql");
        if is_snapshot {
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            snapshot_bytes = Some(buf);
        }
    }
    let snapshot_bytes = snapshot_bytes
        .ok_or_else(|| EnoError::Malformed(format!("no .enosql member in {}", archive_path.display())))?;

    let new_path = engine.data_dir().join(format!("{new_db_name}.enosql"));
    let mut db = Database::from_bytes(&snapshot_bytes, new_path)?;
    db.rename(new_db_name)?;

    let installed = engine.install_database(db)?;
    log::info!("restored backup {} as database {new_db_name}", archive_path.display());
    crate::logger::audit("restore_backup", new_db_name);
    Ok(installed)
}

/// Scans `dir` for `*.tar.gz` archives and peeks each one's
/// `metadata.json` for a `BackupInfo`; malformed archives are silently
/// skipped.
pub fn list_backups(dir: &Path) -> Result<Vec<BackupInfo>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_archive = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".tar.gz"));
        if !is_archive {
            continue;
        }
        if let Some(info) = peek_backup(&path) {
            out.push(info);
        }
    }
    Ok(out)
}

fn peek_backup(path: &Path) -> Option<BackupInfo> {
    let file = std::fs::File::open(path).ok()?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    let entries = archive.entries().ok()?;
    for entry in entries {
        let mut entry = entry.ok()?;
        let entry_path = entry.path().ok()?.to_path_buf();
        if entry_path.file_name().and_then(|n| n.to_str()) != Some("metadata.json") {
            continue;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).ok()?;
        let metadata: ArchiveMetadata = serde_json::from_slice(&buf).ok()?;
        let size_bytes = std::fs::metadata(path).ok()?.len();
        return Some(BackupInfo {
            name: metadata.backup,
            database: metadata.database,
            timestamp: metadata.timestamp,
            size_bytes,
            path: path.to_path_buf(),
        });
    }
    None
}
