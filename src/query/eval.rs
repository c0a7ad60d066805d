//! Operator evaluation and the sort comparator it shares with the
//! stringification-based comparison rule.

use super::types::{Filter, Operator, SortSpec};
use crate::value::{compare, size, stringify, type_tag, Object, Value};
use regex::Regex;
use std::cmp::Ordering;

/// Evaluates a single filter against a document's `data` map. Malformed
/// operands ($in against a non-array, an uncompilable $regex) make the
/// filter non-matching rather than erroring, so one bad clause in a
/// multi-filter query doesn't poison the rest of the results.
#[must_use]
pub fn eval_filter(filter: &Filter, data: &Object) -> bool {
    let present = data.get(&filter.field);
    match filter.operator {
        Operator::Eq => present.is_some_and(|v| compare(v, &filter.value) == Ordering::Equal),
        Operator::Ne => present.is_none_or(|v| compare(v, &filter.value) != Ordering::Equal),
        Operator::Gt => present.is_some_and(|v| compare(v, &filter.value) == Ordering::Greater),
        Operator::Gte => present.is_some_and(|v| compare(v, &filter.value) != Ordering::Less),
        Operator::Lt => present.is_some_and(|v| compare(v, &filter.value) == Ordering::Less),
        Operator::Lte => present.is_some_and(|v| compare(v, &filter.value) != Ordering::Greater),
        Operator::In => present.is_some_and(|v| match &filter.value {
            Value::Array(items) => items.iter().any(|item| compare(item, v) == Ordering::Equal),
            _ => false,
        }),
        Operator::Nin => match &filter.value {
            Value::Array(items) => present.is_none_or(|v| !items.iter().any(|item| compare(item, v) == Ordering::Equal)),
            _ => true,
        },
        Operator::Regex => present.is_some_and(|v| match filter.value.as_str() {
            Some(pattern) => Regex::new(pattern).is_ok_and(|re| re.is_match(&stringify(v))),
            None => false,
        }),
        Operator::Exists => present.is_some() == filter.value.as_bool().unwrap_or(false),
        Operator::Type => present.is_some_and(|v| filter.value.as_str() == Some(type_tag(v))),
        Operator::Size => present.is_some_and(|v| filter.value.as_f64() == Some(size(v) as f64)),
    }
}

/// Conjunction over every filter in the list.
#[must_use]
pub fn eval_filters(filters: &[Filter], data: &Object) -> bool {
    filters.iter().all(|f| eval_filter(f, data))
}

/// Orders two documents' `data` maps by a sort field under the
/// stringification rule; absent values sort last ascending / first
/// descending, so an absent-vs-absent tie falls through to `Equal` and
/// a stable sort preserves input order.
#[must_use]
pub fn compare_by_sort(sort: &SortSpec, a: &Object, b: &Object) -> Ordering {
    let av = a.get(&sort.field);
    let bv = b.get(&sort.field);
    let ordering = match (av, bv) {
        (Some(a), Some(b)) => compare(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if sort.ascending {
        ordering
    } else {
        match ordering {
            Ordering::Less => Ordering::Greater,
            Ordering::Greater => Ordering::Less,
            Ordering::Equal => Ordering::Equal,
        }
    }
}
