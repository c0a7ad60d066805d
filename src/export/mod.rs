//! Bulk export in textual formats: JSON, CSV and SQL
//! writers streaming a collection's documents out.

mod csv;
mod json;
mod sql;

use crate::database::Database;
use crate::errors::{EnoError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Csv,
    Sql,
}

/// Streams `collection_name` of `db` to `writer` in `format`; hosts
/// embedding the engine can stream to a socket or in-memory buffer
/// instead of always touching the filesystem.
pub fn export_to_writer<W: Write>(db: &Database, collection_name: &str, format: ExportFormat, writer: W) -> Result<()> {
    let collection = db
        .get_collection(collection_name)
        .ok_or_else(|| EnoError::NotFound(format!("collection {collection_name}")))?;
    match format {
        ExportFormat::Json => json::write(&collection, writer),
        ExportFormat::Csv => csv::write(&collection, writer),
        ExportFormat::Sql => sql::write(&collection, writer),
    }
}

/// Convenience wrapper returning the export as a `String`.
pub fn export_to_string(db: &Database, collection_name: &str, format: ExportFormat) -> Result<String> {
    let mut buf = Vec::new();
    export_to_writer(db, collection_name, format, &mut buf)?;
    String::from_utf8(buf).map_err(|e| EnoError::Malformed(format!("export produced invalid UTF-8: {e}")))
}

/// Convenience wrapper writing the export directly to a file path.
pub fn export_to_file(db: &Database, collection_name: &str, format: ExportFormat, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    export_to_writer(db, collection_name, format, file)
}
