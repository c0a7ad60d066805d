//! Knobs a host process supplies before constructing an `Engine`.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The directory every database file is rooted under.
    pub data_dir: PathBuf,
    /// Forward-compatible knob for a future read cache. The current
    /// collection implementation keeps every document directly in its
    /// map with no eviction policy, so this is unused by the query path
    /// today but threaded through so a host can tune it without an API
    /// break later.
    #[serde(default = "default_cache_capacity")]
    pub default_cache_capacity: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_cache_capacity() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        EngineConfig {
            data_dir: data_dir.into(),
            default_cache_capacity: default_cache_capacity(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }

    /// Loads a config from a TOML file (e.g. `enosql.toml`). An ambient
    /// convenience, not a spec requirement — hosts may build
    /// `EngineConfig` programmatically instead.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_parses_minimal_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enosql.toml");
        std::fs::write(&path, "data_dir = \"/tmp/enosql\"\n").unwrap();
        let cfg = EngineConfig::from_file(&path).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/enosql"));
        assert_eq!(cfg.log_level, "info");
    }
}
