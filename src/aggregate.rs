//! Aggregation pipeline: match/group stages over projected document
//! maps.

use crate::collection::Collection;
use crate::document::Document;
use crate::errors::{EnoError, Result};
use crate::query::eval::eval_filters;
use crate::query::types::Filter;
use crate::value::{stringify, Object, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pipeline stage. `Match` filters items; `Group` partitions and
/// reduces them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stage {
    Match { filters: Vec<Filter> },
    Group { by: GroupKey, outputs: Vec<GroupOutput> },
}

/// The group-by key: a field name, or any non-string value meaning a
/// single group keyed `"null"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupKey {
    Field(String),
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggFn {
    Count,
    Sum,
    Avg,
    Max,
    Min,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOutput {
    pub name: String,
    pub func: AggFn,
    /// Target field for everything but `count`, which ignores it.
    pub field: Option<String>,
}

impl GroupOutput {
    /// Builds a `GroupOutput` from a function name as it would arrive
    /// from a host-supplied pipeline description (e.g. a config or API
    /// payload naming `"sum"`/`"avg"`/etc. as a string rather than the
    /// closed `AggFn` enum). Fails with `UnsupportedFormat` for any name
    /// outside `count`/`sum`/`avg`/`max`/`min` (spec §4.4).
    pub fn try_new(name: impl Into<String>, func_name: &str, field: Option<String>) -> Result<Self> {
        Ok(GroupOutput { name: name.into(), func: validate_function_name(func_name)?, field })
    }
}

/// A document reprojected to a plain map: `_id`, `created_at`,
/// `updated_at` merged alongside user data.
fn project(doc: &Document) -> Object {
    let mut out = doc.data.clone();
    out.insert("_id".to_string(), Value::String(doc.id.clone()));
    out.insert("created_at".to_string(), Value::Timestamp(doc.created_at));
    out.insert("updated_at".to_string(), Value::Timestamp(doc.updated_at));
    out
}

/// Runs every stage in order over the collection's full document set.
pub fn run(collection: &Collection, stages: &[Stage]) -> Result<Vec<Object>> {
    let mut items: Vec<Object> = collection.get_all().iter().map(project).collect();
    for stage in stages {
        items = run_stage(stage, items)?;
    }
    Ok(items)
}

fn run_stage(stage: &Stage, items: Vec<Object>) -> Result<Vec<Object>> {
    match stage {
        Stage::Match { filters } => Ok(items.into_iter().filter(|item| eval_filters(filters, item)).collect()),
        Stage::Group { by, outputs } => Ok(group(&items, by, outputs)),
    }
}

fn group_key_for(item: &Object, by: &GroupKey) -> String {
    match by {
        GroupKey::Field(field) => match item.get(field) {
            Some(v) => stringify(v),
            None => "null".to_string(),
        },
        GroupKey::Constant => "null".to_string(),
    }
}

fn group(items: &[Object], by: &GroupKey, outputs: &[GroupOutput]) -> Vec<Object> {
    let mut groups: BTreeMap<String, Vec<&Object>> = BTreeMap::new();
    for item in items {
        groups.entry(group_key_for(item, by)).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(key, members)| {
            let mut out = Object::new();
            out.insert("_id".to_string(), Value::String(key));
            for output in outputs {
                out.insert(output.name.clone(), reduce(output, &members));
            }
            out
        })
        .collect()
}

fn numeric_values<'a>(field: &str, members: &[&'a Object]) -> Vec<f64> {
    members.iter().filter_map(|item| item.get(field)).filter_map(Value::as_f64).collect()
}

fn reduce(output: &GroupOutput, members: &[&Object]) -> Value {
    if output.func == AggFn::Count {
        return Value::Int(members.len() as i64);
    }
    let field = output.field.as_deref().unwrap_or_default();
    let values = numeric_values(field, members);
    match output.func {
        AggFn::Count => unreachable!(),
        AggFn::Sum => Value::Float(values.iter().sum()),
        AggFn::Avg => {
            if values.is_empty() {
                Value::Float(0.0)
            } else {
                Value::Float(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        AggFn::Max => values.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))).map_or(Value::Null, Value::Float),
        AggFn::Min => values.iter().cloned().fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v)))).map_or(Value::Null, Value::Float),
    }
}

/// Returns an `UnsupportedFormat` error for aggregation output fields
/// naming an unknown function; used by `GroupOutput::try_new` for
/// callers parsing stage definitions from an external representation
/// (the in-process `AggFn` enum is already closed and cannot name one).
fn validate_function_name(name: &str) -> Result<AggFn> {
    match name {
        "count" => Ok(AggFn::Count),
        "sum" => Ok(AggFn::Sum),
        "avg" => Ok(AggFn::Avg),
        "max" => Ok(AggFn::Max),
        "min" => Ok(AggFn::Min),
        other => Err(EnoError::UnsupportedFormat(format!("aggregation function {other}"))),
    }
}
