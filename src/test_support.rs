#![cfg(test)]
//! Test-only helpers shared across the crate's test modules.

use crate::engine::Engine;

/// Builds an `Engine` rooted at a fresh `tempfile::TempDir`. The
/// directory is returned alongside the engine so callers that need to
/// reopen a second `Engine` over the same files (e.g. persistence
/// tests) can do so before it is dropped.
pub fn temp_engine() -> (Engine, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let engine = Engine::new(dir.path()).expect("open engine");
    (engine, dir)
}
