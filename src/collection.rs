//! Documents indexed by id, plus the per-field secondary indexes that
//! accelerate equality lookup.

use crate::document::Document;
use crate::errors::{EnoError, Result};
use crate::index::{Index, IndexKind};
use crate::query::builder::QueryBuilder;
use crate::query::eval::{compare_by_sort, eval_filters};
use crate::query::types::{Filter, SortSpec};
use crate::value::{compare, Object, Value};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

struct Inner {
    documents: BTreeMap<String, Document>,
    indexes: BTreeMap<String, Index>,
}

/// A named set of documents with zero or more secondary indexes. Owns
/// its own reader-writer lock: reads take a shared lock,
/// mutations take an exclusive one, and no operation here ever reaches
/// up into a `Database` or `Engine` lock.
pub struct Collection {
    name: String,
    inner: RwLock<Inner>,
}

impl Collection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Collection { name: name.into(), inner: RwLock::new(Inner { documents: BTreeMap::new(), indexes: BTreeMap::new() }) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fails with `AlreadyExists` if `id` is already present; otherwise
    /// stores a freshly timestamped document and folds it into every
    /// existing index.
    pub fn insert(&self, id: impl Into<String>, data: Object) -> Result<Document> {
        let id = id.into();
        let mut inner = self.inner.write();
        if inner.documents.contains_key(&id) {
            return Err(EnoError::AlreadyExists(format!("document {id} in collection {}", self.name)));
        }
        let doc = Document::new(id.clone(), data);
        for index in inner.indexes.values_mut() {
            if let Some(v) = doc.data.get(&index.field) {
                index.insert(v, &doc.id);
            }
        }
        inner.documents.insert(id, doc.clone());
        Ok(doc)
    }

    /// Fails with `NotFound` if `id` is absent; removes the document's
    /// prior index contributions, replaces `data` wholesale, and
    /// re-registers the new values.
    pub fn update(&self, id: &str, data: Object) -> Result<Document> {
        let mut inner = self.inner.write();
        if !inner.documents.contains_key(id) {
            return Err(EnoError::NotFound(format!("document {id} in collection {}", self.name)));
        }
        let old_data = inner.documents.get(id).map(|d| d.data.clone()).unwrap_or_default();
        for index in inner.indexes.values_mut() {
            if let Some(v) = old_data.get(&index.field) {
                index.remove(v, id);
            }
        }
        let doc = {
            let d = inner.documents.get_mut(id).expect("checked above");
            d.replace_data(data);
            d.clone()
        };
        for index in inner.indexes.values_mut() {
            if let Some(v) = doc.data.get(&index.field) {
                index.insert(v, &doc.id);
            }
        }
        Ok(doc)
    }

    /// Fails with `NotFound` if `id` is absent; removes index
    /// contributions and the document itself.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let Some(doc) = inner.documents.remove(id) else {
            return Err(EnoError::NotFound(format!("document {id} in collection {}", self.name)));
        };
        for index in inner.indexes.values_mut() {
            if let Some(v) = doc.data.get(&index.field) {
                index.remove(v, id);
            }
        }
        Ok(())
    }

    /// O(1) via the field's index when one exists; otherwise a linear
    /// scan comparing `data[field]` to `value` under the stringification
    /// rule.
    #[must_use]
    pub fn find(&self, field: &str, value: &Value) -> Vec<Document> {
        let inner = self.inner.read();
        if let Some(index) = inner.indexes.get(field) {
            return index
                .lookup(value)
                .into_iter()
                .filter_map(|id| inner.documents.get(&id).cloned())
                .collect();
        }
        inner
            .documents
            .values()
            .filter(|d| d.data.get(field).is_some_and(|v| compare(v, value) == Ordering::Equal))
            .cloned()
            .collect()
    }

    /// All documents, in unspecified order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Document> {
        self.inner.read().documents.values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().documents.is_empty()
    }

    /// Builds an index over `field` by iterating current documents,
    /// replacing any prior index on that field.
    pub fn create_index(&self, field: &str, kind: IndexKind) {
        let mut inner = self.inner.write();
        let mut index = Index::new(field, kind);
        for doc in inner.documents.values() {
            if let Some(v) = doc.data.get(field) {
                index.insert(v, &doc.id);
            }
        }
        inner.indexes.insert(field.to_string(), index);
    }

    pub fn drop_index(&self, field: &str) {
        self.inner.write().indexes.remove(field);
    }

    #[must_use]
    pub fn index_names(&self) -> Vec<String> {
        self.inner.read().indexes.keys().cloned().collect()
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.inner.read().indexes.len()
    }

    /// Mean index-to-document ratio across every index, used by
    /// `CollectionStats::index_efficiency`.
    #[must_use]
    pub fn index_efficiency(&self, field: &str) -> Option<f64> {
        let inner = self.inner.read();
        let index = inner.indexes.get(field)?;
        if inner.documents.is_empty() {
            return Some(0.0);
        }
        Some(index.len() as f64 / inner.documents.len() as f64)
    }

    /// Clears and replays every index from current documents; used by
    /// compaction.
    pub fn rebuild_indexes(&self) {
        let mut inner = self.inner.write();
        let fields: Vec<(String, IndexKind)> =
            inner.indexes.iter().map(|(f, i)| (f.clone(), i.kind)).collect();
        for (field, kind) in fields {
            let mut index = Index::new(&field, kind);
            for doc in inner.documents.values() {
                if let Some(v) = doc.data.get(&field) {
                    index.insert(v, &doc.id);
                }
            }
            inner.indexes.insert(field, index);
        }
    }

    /// Evaluates filters conjunctively, stable-sorts, then paginates
    ///. `limit == 0` means unbounded.
    #[must_use]
    pub fn query(&self, filters: &[Filter], sort: Option<&SortSpec>, skip: usize, limit: usize) -> Vec<Document> {
        let mut matched: Vec<Document> =
            self.inner.read().documents.values().filter(|d| eval_filters(filters, &d.data)).cloned().collect();
        if let Some(sort) = sort {
            matched.sort_by(|a, b| compare_by_sort(sort, &a.data, &b.data));
        }
        let skipped: Vec<Document> = matched.into_iter().skip(skip).collect();
        if limit == 0 {
            skipped
        } else {
            skipped.into_iter().take(limit).collect()
        }
    }

    /// Matching count, ignoring sort/skip/limit.
    #[must_use]
    pub fn count(&self, filters: &[Filter]) -> usize {
        self.inner.read().documents.values().filter(|d| eval_filters(filters, &d.data)).count()
    }

    /// Returns a fresh `QueryBuilder` bound to this collection.
    #[must_use]
    pub fn new_query(self: &Arc<Self>) -> QueryBuilder {
        QueryBuilder::new(Arc::clone(self))
    }

    /// Snapshot of documents and indexes for persistence.
    #[must_use]
    pub(crate) fn snapshot(&self) -> (BTreeMap<String, Document>, BTreeMap<String, Index>) {
        let inner = self.inner.read();
        (inner.documents.clone(), inner.indexes.clone())
    }

    pub(crate) fn from_snapshot(name: impl Into<String>, documents: BTreeMap<String, Document>, indexes: BTreeMap<String, Index>) -> Self {
        Collection { name: name.into(), inner: RwLock::new(Inner { documents, indexes }) }
    }

    #[must_use]
    pub fn average_document_size(&self) -> f64 {
        let inner = self.inner.read();
        if inner.documents.is_empty() {
            return 0.0;
        }
        let total: usize = inner
            .documents
            .values()
            .map(|d| serde_json::to_vec(d).map(|b| b.len()).unwrap_or(0))
            .sum();
        total as f64 / inner.documents.len() as f64
    }

    /// Most-frequent `TypeTag` per top-level field observed across all
    /// documents' `data`.
    #[must_use]
    pub fn field_type_histogram(&self) -> BTreeMap<String, String> {
        let inner = self.inner.read();
        let mut counts: BTreeMap<String, BTreeMap<&'static str, usize>> = BTreeMap::new();
        for doc in inner.documents.values() {
            for (field, value) in &doc.data {
                *counts.entry(field.clone()).or_default().entry(crate::value::type_tag(value)).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(field, tags)| {
                let (tag, _) = tags.into_iter().max_by_key(|(_, count)| *count).unwrap_or(("unknown", 0));
                (field, tag.to_string())
            })
            .collect()
    }
}

impl Clone for Collection {
    fn clone(&self) -> Self {
        let (documents, indexes) = self.snapshot();
        Collection::from_snapshot(self.name.clone(), documents, indexes)
    }
}
