#![forbid(unsafe_code)]
//! An embeddable, schemaless document database engine for a single host
//! process. Callers obtain an [`Engine`] rooted at a data
//! directory, a [`Database`] handle from the engine, a [`Collection`]
//! from the database, and invoke operations on the collection directly,
//! via [`Collection::find`]/[`Collection::new_query`], or via the
//! [`aggregate`] pipeline.
//!
//! Mutations are held in memory until the caller calls
//! [`Engine::save_database`]; the engine lazily loads databases from
//! disk on first reference. [`backup`] and [`import`]/[`export`] round
//! out the operation surface.

pub mod aggregate;
pub mod backup;
pub mod collection;
pub mod config;
pub mod database;
pub mod document;
pub mod engine;
pub mod errors;
pub mod export;
pub mod import;
pub mod index;
pub mod logger;
pub mod query;
pub mod stats;
pub mod value;

#[cfg(test)]
pub mod test_support;

pub use aggregate::{AggFn, GroupKey, GroupOutput, Stage};
pub use backup::BackupInfo;
pub use collection::Collection;
pub use config::EngineConfig;
pub use database::Database;
pub use document::Document;
pub use engine::Engine;
pub use errors::{EnoError, Result};
pub use export::ExportFormat;
pub use import::{ImportFormat, ImportOptions, ImportResult};
pub use index::IndexKind;
pub use query::{Filter, Operator, QueryBuilder, SortSpec};
pub use stats::{CollectionStats, DatabaseStats};
pub use value::{Object, Value};

/// Initializes process-wide logging from `log4rs.yaml` if present.
/// Hosts that don't call this simply get no logger installed and every
/// `log` macro becomes a no-op; it is never required before using the
/// rest of the crate.
pub fn init() -> Result<()> {
    logger::init().map_err(|e| errors::EnoError::Malformed(format!("logger init failed: {e}")))
}
