// Authoritative source backed by a SQLite copy of the data warehouse

use std::collections::{BTreeSet, HashSet};

use rusqlite::{params_from_iter, Connection};

use cohort_audit_config::{SourceConfig, SourceName};
use cohort_audit_recon::model::{CohortGroup, CohortKey, MembershipRecord};

use crate::error::SourceError;
use crate::source::AuthoritativeSource;
use crate::sqlite::{open_read_only, placeholders};

/// Cohorts with at least one bridge row whose student key is the invalid
/// sentinel. Code and name come from a LEFT JOIN and may be NULL.
const ANOMALOUS_COHORTS_SQL: &str = "\
SELECT DISTINCT
    BRIDGE.CHRT_KEY,
    CAST(COHORT.CHRT_CD AS TEXT),
    CAST(COHORT.CHRT_DES AS TEXT)
FROM BG_STDNT_CHRT_MNTR BRIDGE
LEFT JOIN DM_CHRT COHORT ON COHORT.CHRT_KEY = BRIDGE.CHRT_KEY
WHERE BRIDGE.STDNT_KEY < 0
ORDER BY 2, 1";

pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    pub fn connect(config: &SourceConfig) -> Result<Self, SourceError> {
        Ok(Self { conn: open_read_only(config)? })
    }

    fn query_err(e: rusqlite::Error) -> SourceError {
        SourceError::query(SourceName::Warehouse, e)
    }
}

impl AuthoritativeSource for Warehouse {
    fn find_anomalous_cohorts(&self) -> Result<Vec<CohortGroup>, SourceError> {
        let mut stmt = self.conn.prepare(ANOMALOUS_COHORTS_SQL).map_err(Self::query_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(Self::query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Self::query_err)?;

        let mut cohorts = Vec::with_capacity(rows.len());
        for (key, code, name) in rows {
            let code = code.ok_or_else(|| {
                SourceError::DataShape(format!(
                    "cohort key {key} has unresolved student references but no DM_CHRT row"
                ))
            })?;
            let name = name.unwrap_or_else(|| {
                tracing::warn!(cohort_key = key, cohort_code = %code, "cohort has no description");
                String::new()
            });
            cohorts.push(CohortGroup { key: CohortKey(key), code, name });
        }

        tracing::debug!(count = cohorts.len(), "anomalous cohorts");
        Ok(cohorts)
    }

    fn find_valid_memberships(
        &self,
        cohort_keys: &BTreeSet<CohortKey>,
    ) -> Result<Vec<MembershipRecord>, SourceError> {
        if cohort_keys.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT CAST(STU.STDNT_UM_UNQNM AS TEXT), BRIDGE.CHRT_KEY \
             FROM BG_STDNT_CHRT_MNTR BRIDGE \
             LEFT JOIN DM_STDNT STU ON STU.STDNT_KEY = BRIDGE.STDNT_KEY \
             WHERE BRIDGE.STDNT_KEY > 0 AND BRIDGE.CHRT_KEY IN ({}) \
             ORDER BY 2, 1",
            placeholders(cohort_keys.len())
        );

        let mut stmt = self.conn.prepare(&sql).map_err(Self::query_err)?;
        let rows = stmt
            .query_map(params_from_iter(cohort_keys.iter().map(|k| k.0)), |row| {
                Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(Self::query_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Self::query_err)?;

        let mut seen: HashSet<(String, CohortKey)> = HashSet::with_capacity(rows.len());
        let mut memberships = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for (student, key) in rows {
            let Some(student) = student else {
                skipped += 1;
                continue;
            };
            let record = MembershipRecord::new(&student, CohortKey(key));
            // "JDOE" and "jdoe" are distinct rows to the query but one member.
            if seen.insert((record.student.clone(), record.cohort_key)) {
                memberships.push(record);
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "valid bridge rows with no DM_STDNT identifier were skipped");
        }

        tracing::debug!(count = memberships.len(), cohorts = cohort_keys.len(), "valid memberships");
        Ok(memberships)
    }
}
