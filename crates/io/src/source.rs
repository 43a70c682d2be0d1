//! Read-only query interfaces over the two stores.
//!
//! Both are synchronous and stateless from the caller's point of view: each
//! call runs one query and returns owned rows. Dropping an implementation
//! releases its connection.

use std::collections::BTreeSet;

use cohort_audit_recon::model::{CohortGroup, CohortKey, MembershipRecord, MentorAssignment};

use crate::error::SourceError;

/// The institutional record system, treated as ground truth.
pub trait AuthoritativeSource {
    /// Cohorts with at least one bridge reference that does not resolve to a
    /// student. Deduplicated, ordered by cohort code.
    fn find_anomalous_cohorts(&self) -> Result<Vec<CohortGroup>, SourceError>;

    /// Distinct (student, cohort) pairs whose student reference resolves,
    /// restricted to `cohort_keys`. Student identifiers come back lowercased.
    fn find_valid_memberships(
        &self,
        cohort_keys: &BTreeSet<CohortKey>,
    ) -> Result<Vec<MembershipRecord>, SourceError>;
}

/// The application's own operational store.
pub trait LocalSource {
    /// Every student-mentor-cohort assignment whose cohort code is in
    /// `cohort_codes`, as stored.
    fn find_assignments(
        &self,
        cohort_codes: &BTreeSet<String>,
    ) -> Result<Vec<MentorAssignment>, SourceError>;
}
