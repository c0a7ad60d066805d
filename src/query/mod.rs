//! Query evaluator: filter composition, comparison operators, sort,
//! skip/limit, count.

pub mod builder;
pub mod eval;
pub mod types;

pub use builder::QueryBuilder;
pub use types::{Filter, Operator, SortSpec};
