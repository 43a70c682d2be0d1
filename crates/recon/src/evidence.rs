use std::collections::{BTreeMap, BTreeSet};

use crate::model::{AuditInput, AuditSummary, CohortTally, Discrepancy};

/// Compute summary statistics for a finished reconciliation.
pub fn compute_summary(input: &AuditInput, discrepancies: &[Discrepancy]) -> AuditSummary {
    let mut per_cohort: BTreeMap<String, CohortTally> = BTreeMap::new();
    let mut mentors: BTreeSet<&str> = BTreeSet::new();

    for d in discrepancies {
        per_cohort
            .entry(d.cohort_code.clone())
            .or_insert_with(|| CohortTally {
                cohort_name: d.cohort_name.clone(),
                discrepancies: 0,
            })
            .discrepancies += 1;
        // An assignment stored without a mentor has nobody to contact.
        if !d.mentor.is_empty() {
            mentors.insert(d.mentor.as_str());
        }
    }

    let anomalous_cohorts = input
        .cohorts
        .iter()
        .map(|c| c.key)
        .collect::<BTreeSet<_>>()
        .len();

    AuditSummary {
        anomalous_cohorts,
        valid_memberships: input.memberships.len(),
        local_assignments: input.assignments.len(),
        discrepancies: discrepancies.len(),
        affected_cohorts: per_cohort.len(),
        affected_mentors: mentors.into_iter().map(str::to_string).collect(),
        per_cohort,
    }
}
