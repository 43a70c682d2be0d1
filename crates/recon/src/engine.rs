use std::collections::HashSet;

use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::index::CohortIndex;
use crate::model::{AuditInput, AuditMeta, AuditResult, Discrepancy};

/// Run the reconciliation and wrap the discrepancies with summary + meta.
pub fn run(input: &AuditInput, contact_domain: &str) -> Result<AuditResult, ReconError> {
    let discrepancies = reconcile(input, contact_domain)?;
    let summary = compute_summary(input, &discrepancies);

    Ok(AuditResult {
        meta: AuditMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            contact_domain: contact_domain.to_string(),
        },
        summary,
        discrepancies,
    })
}

/// Report every local assignment whose (student, cohort code) pair is not a
/// valid warehouse membership.
///
/// Output follows the order of `input.assignments`. Repeated assignments
/// (several mentors for one student, or verbatim duplicates) each produce a
/// row. Valid memberships with no local assignment are not reported.
pub fn reconcile(input: &AuditInput, contact_domain: &str) -> Result<Vec<Discrepancy>, ReconError> {
    let index = CohortIndex::build(&input.cohorts)?;

    let mut valid_pairs: HashSet<(&str, &str)> = HashSet::with_capacity(input.memberships.len());
    for membership in &input.memberships {
        let cohort = index.by_key(membership.cohort_key).ok_or_else(|| {
            ReconError::DataShape(format!(
                "membership of '{}' references cohort key {} outside the anomalous cohorts",
                membership.student, membership.cohort_key
            ))
        })?;
        valid_pairs.insert((membership.student.as_str(), cohort.code.as_str()));
    }

    tracing::debug!(
        cohorts = index.len(),
        valid_pairs = valid_pairs.len(),
        assignments = input.assignments.len(),
        "reconciling"
    );

    let discrepancies = input
        .assignments
        .iter()
        .filter(|a| !valid_pairs.contains(&(a.student.as_str(), a.cohort_code.as_str())))
        .map(|a| {
            let cohort_name = match index.by_code(&a.cohort_code) {
                Some(cohort) => cohort.name.clone(),
                None => {
                    tracing::warn!(
                        cohort_code = %a.cohort_code,
                        student = %a.student,
                        "assignment cohort is not an anomalous cohort"
                    );
                    String::new()
                }
            };
            Discrepancy {
                student: a.student.clone(),
                mentor: a.mentor.clone(),
                mentor_email: contact_address(&a.mentor, contact_domain),
                cohort_code: a.cohort_code.clone(),
                cohort_name,
            }
        })
        .collect();

    Ok(discrepancies)
}

/// `asmith` + `umich.edu` -> `asmith@umich.edu`. An assignment stored
/// without a mentor has no address.
pub fn contact_address(mentor: &str, domain: &str) -> String {
    if mentor.is_empty() {
        return String::new();
    }
    format!("{mentor}@{domain}")
}
