//! Error types for configuration and asset loading.

/// Configuration could not be used.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Asset loading gave up.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("Failed to load asset {id} after {attempts} attempt(s)")]
    LoadFailed { id: String, attempts: u32 },

    #[error("Assets still loading after {waited_secs:.1}s: {pending:?}")]
    StartupTimeout { waited_secs: f64, pending: Vec<String> },
}
