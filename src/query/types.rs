//! Filter/sort/paginate vocabulary for the query evaluator.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The nine comparison/existence operators a filter can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[serde(rename = "$eq")]
    Eq,
    #[serde(rename = "$ne")]
    Ne,
    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$gte")]
    Gte,
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$lte")]
    Lte,
    #[serde(rename = "$in")]
    In,
    #[serde(rename = "$nin")]
    Nin,
    #[serde(rename = "$regex")]
    Regex,
    #[serde(rename = "$exists")]
    Exists,
    #[serde(rename = "$type")]
    Type,
    #[serde(rename = "$size")]
    Size,
}

/// `{field, operator, value}`, evaluated against `D.data[field]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Filter {
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Filter { field: field.into(), operator, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub ascending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        SortSpec { field: field.into(), ascending }
    }
}
