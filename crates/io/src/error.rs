use std::path::PathBuf;

use cohort_audit_config::SourceName;
use thiserror::Error;

/// Errors reading from either database.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The database could not be opened.
    #[error("cannot connect to the {source_name} database: {message}")]
    Connection { source_name: SourceName, message: String },

    /// A query failed (bad SQL, missing table or column).
    #[error("query against the {source_name} database failed: {message}")]
    Query { source_name: SourceName, message: String },

    /// The query ran but the rows cannot be audited as returned.
    #[error("data shape error: {0}")]
    DataShape(String),
}

impl SourceError {
    pub(crate) fn connection(source_name: SourceName, err: impl std::fmt::Display) -> Self {
        Self::Connection { source_name, message: err.to_string() }
    }

    pub(crate) fn query(source_name: SourceName, err: impl std::fmt::Display) -> Self {
        Self::Query { source_name, message: err.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
