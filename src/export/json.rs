//! JSON export: `{exported_at, count, documents}`.

use crate::collection::Collection;
use crate::errors::Result;
use chrono::Utc;
use std::io::Write;

pub(super) fn write<W: Write>(collection: &Collection, mut writer: W) -> Result<()> {
    let documents = collection.get_all();
    let payload = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "count": documents.len(),
        "documents": documents,
    });
    writer.write_all(serde_json::to_string_pretty(&payload)?.as_bytes())?;
    Ok(())
}
