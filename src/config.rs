//! Configuration loaded from `dafi.toml`.
//!
//! ```toml
//! [converter]
//! max_page_size = 50
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DafiError, DafiResult};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "dafi.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DafiConfig {
    pub converter: ConverterConfig,
}

/// Options of the SQL converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Page size applied when a query does not ask for one (0 = no default).
    pub max_page_size: u64,
}

impl DafiConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> DafiResult<Self> {
        toml::from_str(content).map_err(|e| DafiError::Config(e.to_string()))
    }

    /// Read configuration from a file.
    pub fn from_path(path: impl AsRef<Path>) -> DafiResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `explicit`, else `./dafi.toml`, else
    /// `<config dir>/dafi/config.toml`. Missing files give the defaults.
    pub fn load(explicit: Option<&Path>) -> DafiResult<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_path(path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                debug!(path = %path.display(), "loading config");
                return Self::from_path(&path);
            }
        }

        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("dafi").join("config.toml"));
        }
        paths
    }
}
