// Database credentials
//
// Resolved per source, in order:
// 1. System keychain (service "cohort-audit", account "db/<source>",
//    secret "user:password")
// 2. Environment variables (COHORT_AUDIT_<SOURCE>_USER / _PASSWORD)
//
// Credentials are NEVER read from the config file.

use std::env;

use crate::error::ConfigError;

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "cohort-audit";

/// The two databases the audit reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceName {
    /// Institutional data warehouse (authoritative).
    Warehouse,
    /// The application's operational database.
    Local,
}

impl SourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Warehouse => "warehouse",
            SourceName::Local => "local",
        }
    }

    pub fn user_var(&self) -> String {
        format!("COHORT_AUDIT_{}_USER", self.as_str().to_uppercase())
    }

    pub fn password_var(&self) -> String {
        format!("COHORT_AUDIT_{}_PASSWORD", self.as_str().to_uppercase())
    }

    fn keychain_account(&self) -> String {
        format!("db/{}", self.as_str())
    }
}

impl std::fmt::Display for SourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warehouse" => Ok(SourceName::Warehouse),
            "local" => Ok(SourceName::Local),
            other => Err(format!("unknown source '{other}' (expected warehouse or local)")),
        }
    }
}

/// A database login. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg_attr(not(feature = "keychain"), allow(dead_code))]
impl Credentials {
    fn to_secret(&self) -> String {
        format!("{}:{}", self.user, self.password)
    }

    /// Split a keychain secret at the first ':'.
    fn from_secret(secret: &str) -> Option<Self> {
        let (user, password) = secret.split_once(':')?;
        if user.is_empty() {
            return None;
        }
        Some(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

/// Where a set of credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Keychain,
    Environment,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::Keychain => "keychain",
            CredentialSource::Environment => "environment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub credentials: Credentials,
    pub source: CredentialSource,
}

/// Resolve credentials for a source from the keychain, then the process
/// environment.
pub fn resolve_credentials(source: SourceName) -> Result<ResolvedCredentials, ConfigError> {
    if let Some(credentials) = keychain_lookup(source) {
        tracing::debug!(source = %source, "credentials from keychain");
        return Ok(ResolvedCredentials {
            credentials,
            source: CredentialSource::Keychain,
        });
    }
    resolve_from_env(source, |name| env::var(name).ok())
}

/// Environment half of [`resolve_credentials`], with the variable lookup
/// injected.
pub fn resolve_from_env(
    source: SourceName,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedCredentials, ConfigError> {
    let user = lookup(&source.user_var()).filter(|v| !v.is_empty());
    let password = lookup(&source.password_var());

    match (user, password) {
        (Some(user), Some(password)) => {
            tracing::debug!(source = %source, "credentials from environment");
            Ok(ResolvedCredentials {
                credentials: Credentials { user, password },
                source: CredentialSource::Environment,
            })
        }
        _ => Err(ConfigError::MissingCredentials {
            source_name: source.to_string(),
            user_var: source.user_var(),
            password_var: source.password_var(),
        }),
    }
}

#[cfg(feature = "keychain")]
fn keychain_lookup(source: SourceName) -> Option<Credentials> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &source.keychain_account()).ok()?;
    let secret = entry.get_password().ok()?;
    let credentials = Credentials::from_secret(&secret);
    if credentials.is_none() {
        tracing::warn!(source = %source, "ignoring malformed keychain entry (expected user:password)");
    }
    credentials
}

#[cfg(not(feature = "keychain"))]
fn keychain_lookup(_source: SourceName) -> Option<Credentials> {
    None
}

/// Store credentials for a source in the system keychain
#[cfg(feature = "keychain")]
pub fn store_credentials(source: SourceName, credentials: &Credentials) -> Result<(), ConfigError> {
    if credentials.user.is_empty() || credentials.user.contains(':') {
        return Err(ConfigError::Invalid {
            field: "user".into(),
            reason: "must be non-empty and must not contain ':'".into(),
        });
    }
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &source.keychain_account())
        .map_err(|e| ConfigError::Keychain(format!("failed to create keychain entry: {e}")))?;

    entry
        .set_password(&credentials.to_secret())
        .map_err(|e| ConfigError::Keychain(format!("failed to store credentials: {e}")))
}

#[cfg(not(feature = "keychain"))]
pub fn store_credentials(_source: SourceName, _credentials: &Credentials) -> Result<(), ConfigError> {
    Err(ConfigError::Keychain(
        "keychain support not enabled; use COHORT_AUDIT_<SOURCE>_USER/_PASSWORD instead".into(),
    ))
}

/// Delete stored credentials for a source from the system keychain
#[cfg(feature = "keychain")]
pub fn delete_credentials(source: SourceName) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, &source.keychain_account())
        .map_err(|e| ConfigError::Keychain(format!("failed to access keychain entry: {e}")))?;

    entry
        .delete_credential()
        .map_err(|e| ConfigError::Keychain(format!("failed to delete credentials: {e}")))
}

#[cfg(not(feature = "keychain"))]
pub fn delete_credentials(_source: SourceName) -> Result<(), ConfigError> {
    Err(ConfigError::Keychain("keychain support not enabled".into()))
}
