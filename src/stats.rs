//! Statistics walker: per-database and per-collection size
//! and shape summaries used by operators, not by any query path.

use crate::database::Database;
use serde::{Deserialize, Serialize};

/// Per-collection summary: document/index counts, mean JSON-encoded
/// document size, the most-frequent `TypeTag` per top-level field, and
/// index density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub name: String,
    pub document_count: usize,
    pub index_count: usize,
    pub avg_doc_size: f64,
    pub field_types: std::collections::BTreeMap<String, String>,
    /// `|index.entries| / |documents|` per index, keyed by field name.
    pub index_efficiency: std::collections::BTreeMap<String, f64>,
}

/// Whole-database summary: collection/document/index totals, on-disk
/// size, and one `CollectionStats` per collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub name: String,
    pub collections_count: usize,
    pub total_documents: usize,
    pub total_indexes: usize,
    pub size_on_disk: u64,
    pub collections: Vec<CollectionStats>,
}

impl DatabaseStats {
    /// Walks every collection of `db` and computes the summary.
    /// `size_on_disk` reads the on-disk file's length; a database that
    /// has never been saved reports `0`.
    #[must_use]
    pub fn compute(db: &Database) -> Self {
        let size_on_disk = std::fs::metadata(db.path()).map(|m| m.len()).unwrap_or(0);
        let mut total_documents = 0;
        let mut total_indexes = 0;
        let mut collections = Vec::new();
        for name in db.list_collection_names() {
            let Some(collection) = db.get_collection(&name) else { continue };
            let index_names = collection.index_names();
            let document_count = collection.len();
            let index_count = index_names.len();
            total_documents += document_count;
            total_indexes += index_count;
            let index_efficiency = index_names
                .iter()
                .filter_map(|field| collection.index_efficiency(field).map(|eff| (field.clone(), eff)))
                .collect();
            collections.push(CollectionStats {
                name: name.clone(),
                document_count,
                index_count,
                avg_doc_size: collection.average_document_size(),
                field_types: collection.field_type_histogram(),
                index_efficiency,
            });
        }
        DatabaseStats {
            name: db.name().to_string(),
            collections_count: collections.len(),
            total_documents,
            total_indexes,
            size_on_disk,
            collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::path::PathBuf;

    #[test]
    fn stats_count_documents_and_indexes() {
        let db = Database::empty("shop", PathBuf::from("/tmp/does-not-exist.enosql"));
        let items = db.create_collection("items").unwrap();
        items.insert("a", [("qty".to_string(), Value::Int(3))].into_iter().collect()).unwrap();
        items.insert("b", [("qty".to_string(), Value::Int(5))].into_iter().collect()).unwrap();
        items.create_index("qty", crate::index::IndexKind::Unique);

        let stats = DatabaseStats::compute(&db);
        assert_eq!(stats.collections_count, 1);
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.total_indexes, 1);
        assert_eq!(stats.size_on_disk, 0);
        let items_stats = &stats.collections[0];
        assert_eq!(items_stats.field_types.get("qty"), Some(&"int".to_string()));
        assert_eq!(items_stats.index_efficiency.get("qty"), Some(&1.0));
    }
}
