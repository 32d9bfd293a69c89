//! Error types for analysis and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The traversal left a scope that was never entered, or finished a unit
    /// with frames still open. Indicates a malformed tree or a walker bug;
    /// fatal to the affected unit only.
    #[error("scope stack imbalance in {unit}: {context}")]
    ScopeImbalance { unit: String, context: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
