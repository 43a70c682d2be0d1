// Audit settings
// Loaded from ./cohort-audit.toml or ~/.config/cohort-audit/config.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::credentials::{resolve_credentials, CredentialSource, Credentials, SourceName};
use crate::error::ConfigError;

/// Config file looked for in the working directory when none is given.
pub const LOCAL_CONFIG_FILE: &str = "cohort-audit.toml";

/// Report written when neither the CLI nor the config names one.
pub const DEFAULT_REPORT_PATH: &str = "uniqname_errors.csv";

/// Institutional mail domain appended to mentor identifiers.
pub const DEFAULT_CONTACT_DOMAIN: &str = "umich.edu";

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_report() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_PATH)
}

fn default_contact_domain() -> String {
    DEFAULT_CONTACT_DOMAIN.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    pub warehouse: SourceSettings,
    pub local: SourceSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where a database lives. For the SQLite backend the DSN is a file path
/// (relative paths resolve against the config file) or a `file:` URI.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub dsn: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// Report path, relative to the working directory.
    #[serde(default = "default_report")]
    pub report: PathBuf,
    #[serde(default = "default_contact_domain")]
    pub contact_domain: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            report: default_report(),
            contact_domain: default_contact_domain(),
        }
    }
}

/// Everything a source constructor needs. Built once at startup and passed
/// by reference; never mutated or persisted.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub name: SourceName,
    pub dsn: String,
    pub connect_timeout: Duration,
    pub credentials: Credentials,
    pub credential_source: CredentialSource,
}

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file. Relative DSN paths are resolved against
    /// the file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.warehouse.resolve_relative_to(base_dir);
        config.local.resolve_relative_to(base_dir);
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from an explicit path, else `./cohort-audit.toml`, else the
    /// user-global config.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::from_path(&local);
        }

        match Self::global_config_path() {
            Some(global) if global.exists() => Self::from_path(&global),
            Some(global) => Err(ConfigError::NotFound(format!(
                "{LOCAL_CONFIG_FILE}, {}",
                global.display()
            ))),
            None => Err(ConfigError::NotFound(LOCAL_CONFIG_FILE.to_string())),
        }
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cohort-audit").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, settings) in [("warehouse.dsn", &self.warehouse), ("local.dsn", &self.local)] {
            if settings.dsn.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not be empty".into(),
                });
            }
        }

        let domain = &self.output.contact_domain;
        if domain.is_empty() || domain.contains('@') || domain.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "output.contact_domain".into(),
                reason: format!("'{domain}' is not a mail domain"),
            });
        }

        if self.output.report.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.report".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(())
    }

    pub fn settings_for(&self, source: SourceName) -> &SourceSettings {
        match source {
            SourceName::Warehouse => &self.warehouse,
            SourceName::Local => &self.local,
        }
    }

    /// Pair a source's settings with its resolved credentials.
    pub fn source(&self, source: SourceName) -> Result<SourceConfig, ConfigError> {
        let resolved = resolve_credentials(source)?;
        Ok(self.source_with(source, resolved.credentials, resolved.source))
    }

    pub fn source_with(
        &self,
        source: SourceName,
        credentials: Credentials,
        credential_source: CredentialSource,
    ) -> SourceConfig {
        let settings = self.settings_for(source);
        SourceConfig {
            name: source,
            dsn: settings.dsn.clone(),
            connect_timeout: Duration::from_secs(settings.connect_timeout_secs),
            credentials,
            credential_source,
        }
    }
}

impl SourceSettings {
    fn resolve_relative_to(&mut self, base_dir: &Path) {
        if self.dsn.starts_with("file:") || self.dsn == ":memory:" {
            return;
        }
        let path = Path::new(&self.dsn);
        if path.is_relative() {
            self.dsn = base_dir.join(path).to_string_lossy().into_owned();
        }
    }
}
