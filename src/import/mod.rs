//! Bulk import in textual formats: JSON, CSV and SQL
//! readers streaming rows into a collection's documents.

mod csv;
mod json;
mod options;
mod sql;

pub use options::{ImportFormat, ImportOptions, ImportResult};

use crate::database::Database;
use crate::errors::{EnoError, Result};
use std::path::Path;

/// Imports `content` into `collection_name` of `db`. If
/// `options.create_collection` is set and the collection is missing,
/// it is created on the fly; otherwise a missing collection is a
/// `NotFound` error. If `options.overwrite_data` is set, every document
/// currently in the target collection is removed first.
pub fn import_str(db: &Database, collection_name: &str, content: &str, format: ImportFormat, options: &ImportOptions) -> Result<ImportResult> {
    let collection = if options.create_collection {
        db.get_or_create_collection(collection_name)?
    } else {
        db.get_collection(collection_name)
            .ok_or_else(|| EnoError::NotFound(format!("collection {collection_name}")))?
    };

    if options.overwrite_data {
        for doc in collection.get_all() {
            let _ = collection.delete(&doc.id);
        }
    }

    let result = match format {
        ImportFormat::Json => json::import(&collection, content, options),
        ImportFormat::Csv => csv::import(&collection, content, options),
        ImportFormat::Sql => sql::import(&collection, content, options),
    };
    log::info!("imported {} documents into {collection_name} ({} skipped)", result.imported, result.skipped);
    Ok(result)
}

/// Reads `path` and imports its contents via [`import_str`].
pub fn import_file(db: &Database, collection_name: &str, path: &Path, format: ImportFormat, options: &ImportOptions) -> Result<ImportResult> {
    let content = std::fs::read_to_string(path)?;
    import_str(db, collection_name, &content, format, options)
}
