//! A single record inside a [`crate::collection::Collection`].

use crate::value::Object;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{id, data, created_at, updated_at}`. Owned exclusively by its
/// enclosing collection; created by `insert`, destroyed by `delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub data: Object,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Builds a fresh document stamped with the current time; invariant
    /// `updated_at >= created_at` holds trivially since both are equal.
    #[must_use]
    pub fn new(id: String, data: Object) -> Self {
        let now = Utc::now();
        Document { id, data, created_at: now, updated_at: now }
    }

    /// Replaces `data` wholesale and bumps `updated_at`, preserving
    /// `created_at` and the `updated_at >= created_at` invariant.
    pub fn replace_data(&mut self, data: Object) {
        self.data = data;
        self.updated_at = Utc::now();
    }
}
