//! Shared import vocabulary: the three supported formats,
//! the per-call options, and the partial-success report every importer
//! returns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    Json,
    Csv,
    Sql,
}

/// `id_field`: when non-empty and present on an imported document, its
/// stringified value becomes the id (and the field is stripped from
/// `data`); otherwise a generated id is used. `overwrite_data`: clear
/// the target collection before importing. `create_collection`: create
/// the collection on the fly if missing, instead of failing.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub id_field: String,
    pub overwrite_data: bool,
    pub create_collection: bool,
}

/// `{imported, skipped, errors}`. Per-row failures are recorded in
/// `errors` and counted in `skipped` rather than aborting the whole
/// import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// `imported_{nanos}_{index}` — the fallback id for JSON imports with
/// no configured (or unmatched) `id_field`.
#[must_use]
pub fn generated_json_id(index: usize) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("imported_{nanos}_{index}")
}

/// `csv_import_{unix}_{row}` — the fallback id for CSV rows with no
/// `_id` column.
#[must_use]
pub fn generated_csv_id(row: usize) -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("csv_import_{secs}_{row}")
}
