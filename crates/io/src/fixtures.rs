// Test databases shaped like the warehouse and the local store

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection};

use cohort_audit_config::{CredentialSource, Credentials, SourceConfig, SourceName};

pub(crate) const WAREHOUSE_SCHEMA: &str = r#"
CREATE TABLE DM_CHRT (
    CHRT_KEY INTEGER PRIMARY KEY,
    CHRT_CD  TEXT,
    CHRT_DES TEXT
);
CREATE TABLE DM_STDNT (
    STDNT_KEY      INTEGER PRIMARY KEY,
    STDNT_UM_UNQNM TEXT
);
-- STDNT_KEY < 0 marks a reference that did not resolve to a student
CREATE TABLE BG_STDNT_CHRT_MNTR (
    STDNT_KEY INTEGER NOT NULL,
    CHRT_KEY  INTEGER NOT NULL,
    MNTR_KEY  INTEGER
);
"#;

pub(crate) const LOCAL_SCHEMA: &str = r#"
CREATE TABLE management_studentcohortmentor (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT,
    mentor_id  TEXT,
    cohort_id  TEXT
);
"#;

pub(crate) fn source_config(name: SourceName, path: &Path) -> SourceConfig {
    SourceConfig {
        name,
        dsn: path.to_string_lossy().into_owned(),
        connect_timeout: Duration::from_secs(1),
        credentials: Credentials {
            user: "reader".into(),
            password: "pw".into(),
        },
        credential_source: CredentialSource::Environment,
    }
}

/// Warehouse with three cohorts:
/// - 1 / C1 "Fall Cohort": JDOE valid, one unresolved reference
/// - 2 / C2 "Winter Cohort": MROE valid, JDOE valid, two unresolved references
/// - 3 / C3 "Spring Cohort": all references resolve (not anomalous)
pub(crate) fn warehouse_db(dir: &Path) -> PathBuf {
    let path = dir.join("warehouse.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(WAREHOUSE_SCHEMA).unwrap();

    for (key, code, name) in [(1, "C1", "Fall Cohort"), (2, "C2", "Winter Cohort"), (3, "C3", "Spring Cohort")] {
        conn.execute("INSERT INTO DM_CHRT VALUES (?1, ?2, ?3)", params![key, code, name]).unwrap();
    }
    for (key, uniqname) in [(101, "JDOE"), (102, "MROE"), (103, "KLEE")] {
        conn.execute("INSERT INTO DM_STDNT VALUES (?1, ?2)", params![key, uniqname]).unwrap();
    }
    for (student, cohort) in [(101, 1), (101, 1), (-1, 1), (102, 2), (101, 2), (-1, 2), (-7, 2), (103, 3)] {
        conn.execute(
            "INSERT INTO BG_STDNT_CHRT_MNTR (STDNT_KEY, CHRT_KEY, MNTR_KEY) VALUES (?1, ?2, 900)",
            params![student, cohort],
        )
        .unwrap();
    }
    path
}

pub(crate) fn local_db(dir: &Path, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join("local.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(LOCAL_SCHEMA).unwrap();
    for (student, mentor, cohort) in rows {
        conn.execute(
            "INSERT INTO management_studentcohortmentor (student_id, mentor_id, cohort_id) VALUES (?1, ?2, ?3)",
            params![student, mentor, cohort],
        )
        .unwrap();
    }
    path
}
