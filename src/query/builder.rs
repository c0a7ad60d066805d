//! `QueryBuilder`: filters, sort, skip and limit accumulated against a
//! bound collection.

use super::types::{Filter, Operator, SortSpec};
use crate::collection::Collection;
use crate::document::Document;
use crate::value::Value;
use std::sync::Arc;

/// Returned by `Collection::new_query`. Accumulates state and is
/// consumed by `execute`/`count`; read-only against the collection.
pub struct QueryBuilder {
    collection: Arc<Collection>,
    filters: Vec<Filter>,
    sort: Option<SortSpec>,
    skip: usize,
    limit: usize,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(collection: Arc<Collection>) -> Self {
        QueryBuilder { collection, filters: Vec::new(), sort: None, skip: 0, limit: 0 }
    }

    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, operator: Operator, value: Value) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort = Some(SortSpec::new(field, ascending));
        self
    }

    #[must_use]
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    #[must_use]
    pub fn execute(&self) -> Vec<Document> {
        self.collection.query(&self.filters, self.sort.as_ref(), self.skip, self.limit)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.collection.count(&self.filters)
    }
}
