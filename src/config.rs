//! Analyzer configuration loaded from `phlint.toml`.
//!
//! ```toml
//! # phlint.toml
//!
//! [analyzer]
//! suppress = [
//!     "Remove eval() usage to prevent code injection vulnerabilities",
//! ]
//! debug_functions = ["var_dump", "print_r", "dd"]
//! global_access_suffixes = ["Controller", "Middleware", "Kernel"]
//!
//! [thresholds.classes]
//! class_size = { warn = 20, error = 48 }
//!
//! [thresholds.routines]
//! cyclomatic_complexity = { warn = 8, error = 20 }
//! ```
//!
//! Every field has a default, so a missing or partial file still yields a
//! working configuration.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AnalyzerError, Result};
use crate::metrics::ThresholdTable;

/// File name searched for in the project root.
pub const CONFIG_FILE: &str = "phlint.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Metric limits; anything not overridden keeps its built-in bound.
    #[serde(default)]
    pub thresholds: ThresholdTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Issue messages dropped from every report, matched exactly.
    #[serde(default)]
    pub suppress: Vec<String>,

    /// Function names flagged as debug output that must not ship.
    #[serde(default = "default_debug_functions")]
    pub debug_functions: Vec<String>,

    /// Class-name suffixes allowed to read superglobals.
    #[serde(default = "default_global_access_suffixes")]
    pub global_access_suffixes: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            suppress: Vec::new(),
            debug_functions: default_debug_functions(),
            global_access_suffixes: default_global_access_suffixes(),
        }
    }
}

fn default_debug_functions() -> Vec<String> {
    ["debug_print_backtrace", "debug_zval_dump", "print_r", "var_dump"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_global_access_suffixes() -> Vec<String> {
    ["Controller", "Middleware"].into_iter().map(String::from).collect()
}

impl AnalyzerConfig {
    /// True if the message is on the suppress list. Matching is exact; a
    /// suppressed message never reaches a report.
    pub fn is_suppressed(&self, message: &str) -> bool {
        self.suppress.iter().any(|m| m == message)
    }
}

impl Config {
    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `phlint.toml` from the project root, falling back to defaults
    /// if the file is absent or unreadable.
    pub fn load_or_default(root: &Path) -> Config {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            debug!("no {} found, using defaults", CONFIG_FILE);
            return Config::default();
        }
        match Config::load(&path) {
            Ok(config) => {
                debug!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("failed to load {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// True if the message is on the suppress list.
    pub fn is_suppressed(&self, message: &str) -> bool {
        self.analyzer.is_suppressed(message)
    }
}
