//! SQL export: a header comment, a `CREATE TABLE IF NOT
//! EXISTS`, then one `INSERT` per document. This is the engine's own
//! textual form, not general-purpose SQL.

use crate::collection::Collection;
use crate::errors::Result;
use std::io::Write;

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}

pub(super) fn write<W: Write>(collection: &Collection, mut writer: W) -> Result<()> {
    writeln!(writer, "-- enosql export of collection {}", collection.name())?;
    writeln!(
        writer,
        "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, data TEXT, created_at TEXT, updated_at TEXT);",
        collection.name()
    )?;
    for doc in collection.get_all() {
        let data_json = serde_json::to_string(&doc.data)?;
        writeln!(
            writer,
            "INSERT INTO {} (id, data, created_at, updated_at) VALUES ('{}', '{}', '{}', '{}');",
            collection.name(),
            escape(&doc.id),
            escape(&data_json),
            doc.created_at.to_rfc3339(),
            doc.updated_at.to_rfc3339()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn writes_create_table_and_insert_per_document() {
        let c = Collection::new("items");
        c.insert("a", [("name".to_string(), Value::String("O'Brien".into()))].into_iter().collect()).unwrap();
        let mut buf = Vec::new();
        write(&c, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("CREATE TABLE IF NOT EXISTS items"));
        assert!(text.contains("INSERT INTO items"));
        assert!(text.contains("O''Brien"));
    }
}
