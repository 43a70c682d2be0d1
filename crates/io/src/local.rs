// Local source backed by the application's SQLite database

use std::collections::BTreeSet;

use rusqlite::{params_from_iter, Connection};

use cohort_audit_config::{SourceConfig, SourceName};
use cohort_audit_recon::model::MentorAssignment;

use crate::error::SourceError;
use crate::source::LocalSource;
use crate::sqlite::{open_read_only, placeholders};

pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn connect(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self { conn: open_read_only(config)? })
    }
}

impl LocalSource for LocalStore {
    fn find_assignments(
        &self,
        cohort_codes: &BTreeSet<String>,
    ) -> Result<Vec<MentorAssignment>, SourceError> {
        if cohort_codes.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT CAST(student_id AS TEXT), CAST(mentor_id AS TEXT), CAST(cohort_id AS TEXT) \
             FROM management_studentcohortmentor \
             WHERE cohort_id IN ({}) \
             ORDER BY 3, 1, 2",
            placeholders(cohort_codes.len())
        );

        let query_err = |e: rusqlite::Error| SourceError::query(SourceName::Local, e);
        let mut stmt = self.conn.prepare(&sql).map_err(query_err)?;
        let rows = stmt
            .query_map(params_from_iter(cohort_codes.iter()), |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_err)?;

        let assignments: Vec<MentorAssignment> = rows
            .into_iter()
            .map(|(student, mentor, cohort_code)| {
                if student.is_none() || mentor.is_none() {
                    tracing::warn!(cohort_code = %cohort_code, "assignment with NULL student or mentor");
                }
                MentorAssignment {
                    student: student.unwrap_or_default(),
                    mentor: mentor.unwrap_or_default(),
                    cohort_code,
                }
            })
            .collect();

        tracing::debug!(count = assignments.len(), cohorts = cohort_codes.len(), "local assignments");
        Ok(assignments)
    }
}
