//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No config file given and none found in the default locations.
    #[error("no config file found (looked for {0})")]
    NotFound(String),

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed fine but a value is unusable.
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },

    /// Neither the keychain nor the environment holds credentials for a source.
    #[error("no credentials for the {source_name} database")]
    MissingCredentials {
        source_name: String,
        user_var: String,
        password_var: String,
    },

    /// System keychain access failed.
    #[error("keychain error: {0}")]
    Keychain(String),
}
