// Configuration loading
//
// Connection settings live in a TOML file; database credentials never do.
// They are resolved per source from the system keychain or the environment.

pub mod credentials;
pub mod error;
pub mod settings;

pub use credentials::{Credentials, CredentialSource, ResolvedCredentials, SourceName};
pub use error::ConfigError;
pub use settings::{AuditConfig, OutputSettings, SourceConfig, SourceSettings};
