//! Configuration for reffinder.
//!
//! Configuration is read from an optional `reffinder.yaml` at the corpus
//! root. A missing file means defaults; command-line flags override whatever
//! the file says.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::{ScanOptions, DEFAULT_EXCLUDES};
use crate::error::{Error, Result};
use crate::types::Direction;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "reffinder.yaml";

/// Default cache directory, relative to the corpus root
pub const DEFAULT_CACHE_DIR: &str = ".reffinder";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the cached index, relative to the corpus root
    pub cache_dir: String,

    /// Directory names skipped while scanning
    pub exclude: Vec<String>,

    /// Direction used when none is given
    pub direction: Direction,

    /// Whether assets are refreshed before they are shown
    pub refresh_before_visit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
            direction: Direction::default(),
            refresh_before_visit: true,
        }
    }
}

impl Config {
    /// Load `reffinder.yaml` from `root`, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is invalid.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Scan options derived from this configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            exclude: self.exclude.clone(),
        }
    }
}
