//! CSV import: header-driven rows with best-effort scalar
//! type inference.

use super::options::{generated_csv_id, ImportOptions, ImportResult};
use crate::collection::Collection;
use crate::value::{Object, Value};

const SYSTEM_COLUMNS: [&str; 3] = ["_id", "created_at", "updated_at"];

pub(super) fn import(collection: &Collection, content: &str, options: &ImportOptions) -> ImportResult {
    let mut result = ImportResult::default();
    let mut reader = ::csv::ReaderBuilder::new().has_headers(true).from_reader(content.as_bytes());
    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(str::to_string).collect(),
        Err(e) => {
            result.errors.push(format!("invalid CSV headers: {e}"));
            result.skipped += 1;
            return result;
        }
    };

    for (row_index, record) in reader.records().enumerate() {
        let row_no = row_index + 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                result.errors.push(format!("row {row_no}: {e}"));
                result.skipped += 1;
                continue;
            }
        };
        if record.len() != headers.len() {
            result.errors.push(format!("row {row_no}: expected {} columns, found {}", headers.len(), record.len()));
            result.skipped += 1;
            continue;
        }

        let mut data = Object::new();
        let mut id: Option<String> = None;
        for (header, cell) in headers.iter().zip(record.iter()) {
            if header == "_id" {
                id = Some(cell.to_string());
                continue;
            }
            if SYSTEM_COLUMNS.contains(&header.as_str()) {
                continue;
            }
            data.insert(header.clone(), infer_value(cell));
        }
        let id = id.unwrap_or_else(|| generated_csv_id(row_no));

        match collection.insert(id, data) {
            Ok(_) => result.imported += 1,
            Err(e) => {
                result.errors.push(format!("row {row_no}: {e}"));
                result.skipped += 1;
            }
        }
    }
    result
}

/// Parse as integer if possible, else float, else boolean, else leave
/// as a string.
fn infer_value(cell: &str) -> Value {
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return Value::Float(f);
    }
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}
