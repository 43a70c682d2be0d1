use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Warehouse surrogate key of a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CohortKey(pub i64);

impl std::fmt::Display for CohortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cohort as the warehouse describes it. The warehouse identifies it by
/// `key`, the local store by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortGroup {
    pub key: CohortKey,
    pub code: String,
    pub name: String,
}

/// One student the warehouse resolves as a member of one cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRecord {
    pub student: String,
    pub cohort_key: CohortKey,
}

impl MembershipRecord {
    /// Student identifiers are lowercased; the warehouse stores them in a
    /// different case than the local store.
    pub fn new(student: &str, cohort_key: CohortKey) -> Self {
        Self {
            student: normalize_student(student),
            cohort_key,
        }
    }
}

/// Canonical form of a warehouse student identifier.
pub fn normalize_student(student: &str) -> String {
    student.to_lowercase()
}

/// A local-store row linking a student to a mentor within a cohort.
/// Taken as stored; no case normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorAssignment {
    pub student: String,
    pub mentor: String,
    pub cohort_code: String,
}

/// Everything the engine needs, pre-loaded from both stores.
#[derive(Debug, Clone, Default)]
pub struct AuditInput {
    pub cohorts: Vec<CohortGroup>,
    pub memberships: Vec<MembershipRecord>,
    pub assignments: Vec<MentorAssignment>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A local assignment whose student the warehouse does not list as a valid
/// member of that cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub student: String,
    pub mentor: String,
    pub mentor_email: String,
    pub cohort_code: String,
    pub cohort_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortTally {
    pub cohort_name: String,
    pub discrepancies: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub anomalous_cohorts: usize,
    pub valid_memberships: usize,
    pub local_assignments: usize,
    pub discrepancies: usize,
    pub affected_cohorts: usize,
    /// Distinct mentors who have at least one discrepancy to resolve.
    pub affected_mentors: Vec<String>,
    /// Keyed by cohort code.
    pub per_cohort: BTreeMap<String, CohortTally>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditMeta {
    pub engine_version: String,
    pub run_at: String,
    pub contact_domain: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub meta: AuditMeta,
    pub summary: AuditSummary,
    pub discrepancies: Vec<Discrepancy>,
}
