//! CSV export: `_id, created_at, updated_at, <union of
//! top-level data keys in stable order>`.

use crate::collection::Collection;
use crate::errors::Result;
use crate::value::stringify;
use std::collections::BTreeSet;
use std::io::Write;

pub(super) fn write<W: Write>(collection: &Collection, writer: W) -> Result<()> {
    let documents = collection.get_all();
    let mut keys: BTreeSet<String> = BTreeSet::new();
    for doc in &documents {
        keys.extend(doc.data.keys().cloned());
    }
    let mut wtr = ::csv::Writer::from_writer(writer);

    let mut header = vec!["_id".to_string(), "created_at".to_string(), "updated_at".to_string()];
    header.extend(keys.iter().cloned());
    wtr.write_record(&header)?;

    for doc in &documents {
        let mut row = vec![doc.id.clone(), doc.created_at.to_rfc3339(), doc.updated_at.to_rfc3339()];
        for key in &keys {
            row.push(doc.data.get(key).map(stringify).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn header_has_union_of_data_keys() {
        let c = Collection::new("items");
        c.insert("a", [("name".to_string(), Value::String("apple".into()))].into_iter().collect()).unwrap();
        c.insert("b", [("qty".to_string(), Value::Int(5))].into_iter().collect()).unwrap();
        let mut buf = Vec::new();
        write(&c, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "_id,created_at,updated_at,name,qty");
    }
}
