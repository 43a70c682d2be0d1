//! CLI Exit Code Registry
//!
//! Single source of truth for the exit codes of `cohort-audit`. Scheduled
//! jobs branch on them, so they are part of the shell contract.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (report written, possibly header-only)       |
//! | 2    | CLI usage error (bad args, bad stdin input)          |
//! | 60   | Config missing, unreadable or invalid                |
//! | 61   | Credentials missing, or keychain access failed       |
//! | 62   | Cannot connect to a database                         |
//! | 63   | Query failed (missing table or column, bad SQL)      |
//! | 64   | Data shape error (rows cannot be audited as returned)|
//! | 65   | Report could not be written                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Update the table above
//! 3. Wire it into the relevant `*_exit_code` mapping

use cohort_audit_config::ConfigError;
use cohort_audit_io::SourceError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments or unusable stdin input.
/// clap uses the same code for parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Config file not found, unreadable, unparseable or failing validation.
pub const EXIT_CONFIG: u8 = 60;

/// No credentials for a source in the keychain or the environment, or the
/// keychain itself failed.
pub const EXIT_CREDENTIALS: u8 = 61;

/// A database could not be opened.
pub const EXIT_CONNECTION: u8 = 62;

/// A query against either database failed.
pub const EXIT_QUERY: u8 = 63;

/// The queries ran but returned rows the audit cannot interpret.
pub const EXIT_DATA_SHAPE: u8 = 64;

/// The CSV report could not be written.
pub const EXIT_WRITE: u8 = 65;

pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingCredentials { .. } | ConfigError::Keychain(_) => EXIT_CREDENTIALS,
        ConfigError::Read { .. }
        | ConfigError::NotFound(_)
        | ConfigError::Parse(_)
        | ConfigError::Invalid { .. } => EXIT_CONFIG,
    }
}

pub fn source_exit_code(err: &SourceError) -> u8 {
    match err {
        SourceError::Connection { .. } => EXIT_CONNECTION,
        SourceError::Query { .. } => EXIT_QUERY,
        SourceError::DataShape(_) => EXIT_DATA_SHAPE,
    }
}
