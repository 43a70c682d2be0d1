// Shared SQLite connection handling for both sources

use rusqlite::{Connection, OpenFlags};

use cohort_audit_config::SourceConfig;

use crate::error::SourceError;

/// Open a source read-only. The DSN may be a path or a `file:` URI.
///
/// The SQLite backend has no server-side login; the configured user is
/// recorded in the connection log line and the password is not consulted.
pub(crate) fn open_read_only(config: &SourceConfig) -> Result<Connection, SourceError> {
    tracing::info!(
        source = %config.name,
        dsn = %config.dsn,
        user = %config.credentials.user,
        credentials = config.credential_source.as_str(),
        "connecting"
    );

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(&config.dsn, flags)
        .map_err(|e| SourceError::connection(config.name, e))?;

    conn.busy_timeout(config.connect_timeout)
        .map_err(|e| SourceError::connection(config.name, e))?;

    // Opening is lazy; reading the catalog makes a non-database file fail
    // here rather than on the first real query.
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
        .map_err(|e| SourceError::connection(config.name, e))?;

    Ok(conn)
}

/// `?1, ?2, ..., ?n` for an IN list.
pub(crate) fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}
