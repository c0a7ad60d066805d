//! JSON import: the three accepted document shapes.

use super::options::{generated_json_id, ImportOptions, ImportResult};
use crate::collection::Collection;
use crate::value::Value;

pub(super) fn import(collection: &Collection, content: &str, options: &ImportOptions) -> ImportResult {
    let mut result = ImportResult::default();
    let parsed: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            result.errors.push(format!("invalid JSON: {e}"));
            result.skipped += 1;
            return result;
        }
    };

    let elements: Vec<serde_json::Value> = match &parsed {
        // (a) {documents: [...]}
        serde_json::Value::Object(map) if map.contains_key("documents") => {
            match map.get("documents").and_then(|v| v.as_array()) {
                Some(items) => items.clone(),
                None => {
                    result.errors.push("`documents` must be an array".to_string());
                    result.skipped += 1;
                    return result;
                }
            }
        }
        // (b) an array of objects
        serde_json::Value::Array(items) => items.clone(),
        // (c) a single object
        serde_json::Value::Object(_) => vec![parsed.clone()],
        _ => {
            result.errors.push("expected a JSON object or array".to_string());
            result.skipped += 1;
            return result;
        }
    };

    for (index, element) in elements.into_iter().enumerate() {
        match import_one(collection, element, index, options) {
            Ok(()) => result.imported += 1,
            Err(msg) => {
                result.errors.push(msg);
                result.skipped += 1;
            }
        }
    }
    result
}

fn import_one(collection: &Collection, element: serde_json::Value, index: usize, options: &ImportOptions) -> Result<(), String> {
    let mut obj = match element {
        serde_json::Value::Object(map) => map,
        _ => return Err(format!("element {index}: expected an object")),
    };
    // Each element may have a `data` sub-map to unwrap.
    let mut data_obj = match obj.remove("data") {
        Some(serde_json::Value::Object(inner)) => inner,
        Some(_) => return Err(format!("element {index}: `data` must be an object")),
        None => obj,
    };

    let id = match options.id_field.as_str() {
        "" => generated_json_id(index),
        field => match data_obj.remove(field) {
            Some(value) => crate::value::stringify(&Value::from_json(&value)),
            None => generated_json_id(index),
        },
    };

    let data = Value::from_json(&serde_json::Value::Object(data_obj))
        .as_object()
        .cloned()
        .unwrap_or_default();
    collection.insert(id, data).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::options::ImportOptions;

    #[test]
    fn imports_documents_array_shape() {
        let c = Collection::new("items");
        let content = r#"{"documents":[{"data":{"name":"apple"}},{"data":{"name":"banana"}}]}"#;
        let result = import(&c, content, &ImportOptions::default());
        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn uses_id_field_when_configured() {
        let c = Collection::new("items");
        let content = r#"[{"sku":"a1","name":"apple"}]"#;
        let opts = ImportOptions { id_field: "sku".to_string(), ..Default::default() };
        let result = import(&c, content, &opts);
        assert_eq!(result.imported, 1);
        let doc = c.find("name", &Value::String("apple".into()));
        assert_eq!(doc[0].id, "a1");
        assert!(!doc[0].data.contains_key("sku"));
    }

    #[test]
    fn single_object_becomes_one_document() {
        let c = Collection::new("items");
        let content = r#"{"name":"apple"}"#;
        let result = import(&c, content, &ImportOptions::default());
        assert_eq!(result.imported, 1);
    }
}
