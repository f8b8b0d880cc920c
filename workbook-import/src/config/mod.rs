//! Importer configuration
//!
//! Read from `<config dir>/workbook-import/config.toml`; a missing file
//! means defaults. Command-line flags override individual values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "workbook-import";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Schema catalog used by the built-in lookup
    pub schema: Option<PathBuf>,
    /// Where to write the store snapshot; stdout when unset
    pub output: Option<PathBuf>,
    /// Row pipelines allowed in flight per sheet (0 = unbounded)
    pub max_concurrent_rows: usize,
    /// Default log filter, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            schema: None,
            output: None,
            max_concurrent_rows: 0,
            log_level: "warn".to_string(),
        }
    }
}

impl ImportConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Config file does not exist: {}", p.display());
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
