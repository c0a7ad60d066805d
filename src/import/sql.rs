//! SQL import: line-oriented, and only ever intended to round-trip
//! this crate's own SQL export — it makes no claim to general-purpose
//! SQL support.

use super::options::{ImportOptions, ImportResult};
use crate::collection::Collection;
use crate::value::Value;

pub(super) fn import(collection: &Collection, content: &str, _options: &ImportOptions) -> ImportResult {
    let mut result = ImportResult::default();
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.to_uppercase().starts_with("INSERT") {
            continue;
        }
        match parse_insert(trimmed) {
            Some((id, data_json)) => match serde_json::from_str::<serde_json::Value>(&data_json) {
                Ok(json) => {
                    let data = Value::from_json(&json).as_object().cloned().unwrap_or_default();
                    match collection.insert(id, data) {
                        Ok(_) => result.imported += 1,
                        Err(e) => {
                            result.errors.push(format!("line {}: {e}", line_no + 1));
                            result.skipped += 1;
                        }
                    }
                }
                Err(e) => {
                    result.errors.push(format!("line {}: malformed data JSON: {e}", line_no + 1));
                    result.skipped += 1;
                }
            },
            None => {
                result.errors.push(format!("line {}: malformed INSERT statement", line_no + 1));
                result.skipped += 1;
            }
        }
    }
    result
}

/// Locates `VALUES (...)`, splits the tuple on `', '` (the engine's own
/// exported form), and returns the first two positions (id, JSON data).
fn parse_insert(line: &str) -> Option<(String, String)> {
    let upper = line.to_uppercase();
    let values_at = upper.find("VALUES")?;
    let rest = &line[values_at + "VALUES".len()..];
    let open = rest.find('(')?;
    let close = rest.rfind(')')?;
    if close <= open {
        return None;
    }
    let tuple = &rest[open + 1..close];
    let fields = split_tuple(tuple);
    if fields.len() < 2 {
        return None;
    }
    Some((fields[0].clone(), fields[1].clone()))
}

fn split_tuple(tuple: &str) -> Vec<String> {
    let parts: Vec<&str> = tuple.split("', '").collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut s = part.trim();
            if i == 0 {
                s = s.strip_prefix('\'').unwrap_or(s);
            }
            if i == last {
                s = s.strip_suffix('\'').unwrap_or(s);
            }
            s.replace("''", "'")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::options::ImportOptions;

    #[test]
    fn imports_engines_own_export_form() {
        let c = Collection::new("items");
        let content = "INSERT INTO items (id, data, created_at, updated_at) VALUES ('a', '{\"name\":\"apple\"}', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z');";
        let result = import(&c, content, &ImportOptions::default());
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 0);
        assert_eq!(c.get_all()[0].id, "a");
    }

    #[test]
    fn malformed_line_is_recorded_and_skipped() {
        let c = Collection::new("items");
        let content = "INSERT garbage without values";
        let result = import(&c, content, &ImportOptions::default());
        assert_eq!(result.imported, 0);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn non_insert_lines_are_ignored() {
        let c = Collection::new("items");
        let content = "-- a comment\nCREATE TABLE items (id TEXT);";
        let result = import(&c, content, &ImportOptions::default());
        assert_eq!(result.imported, 0);
        assert_eq!(result.skipped, 0);
        assert!(result.errors.is_empty());
    }
}
