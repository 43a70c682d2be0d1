use std::collections::HashSet;

use cohort_audit_recon::model::{
    AuditInput, CohortGroup, CohortKey, MembershipRecord, MentorAssignment,
};
use cohort_audit_recon::{reconcile, run, ReconError};

fn cohort(key: i64, code: &str, name: &str) -> CohortGroup {
    CohortGroup {
        key: CohortKey(key),
        code: code.into(),
        name: name.into(),
    }
}

fn assignment(student: &str, mentor: &str, code: &str) -> MentorAssignment {
    MentorAssignment {
        student: student.into(),
        mentor: mentor.into(),
        cohort_code: code.into(),
    }
}

/// Three anomalous cohorts, a mix of valid, typo'd and never-enrolled students.
fn term_input() -> AuditInput {
    AuditInput {
        cohorts: vec![
            cohort(10, "ENG-F25", "Engineering Fall 2025"),
            cohort(11, "LSA-F25", "LSA Fall 2025"),
            cohort(12, "RACKHAM", "Rackham PhD Candidates"),
        ],
        memberships: vec![
            MembershipRecord::new("AJONES", CohortKey(10)),
            MembershipRecord::new("bchen", CohortKey(10)),
            MembershipRecord::new("CDIAZ", CohortKey(11)),
            MembershipRecord::new("ajones", CohortKey(11)),
            MembershipRecord::new("eokafor", CohortKey(12)),
        ],
        assignments: vec![
            assignment("ajones", "mpatel", "ENG-F25"),
            assignment("bchen", "mpatel", "ENG-F25"),
            assignment("bchne", "mpatel", "ENG-F25"),
            assignment("cdiaz", "rkim", "LSA-F25"),
            assignment("ajones", "rkim", "LSA-F25"),
            assignment("dnovak", "rkim", "LSA-F25"),
            assignment("dnovak", "tsato", "LSA-F25"),
            assignment("eokafor", "tsato", "RACKHAM"),
            assignment("fwright", "tsato", "RACKHAM"),
        ],
    }
}

// -------------------------------------------------------------------------
// Scenario
// -------------------------------------------------------------------------

#[test]
fn fall_cohort_scenario() {
    let input = AuditInput {
        cohorts: vec![cohort(1, "C1", "Fall Cohort")],
        memberships: vec![MembershipRecord::new("jdoe", CohortKey(1))],
        assignments: vec![
            assignment("jdoe", "asmith", "C1"),
            assignment("bsmith", "asmith", "C1"),
        ],
    };

    let rows = reconcile(&input, "umich.edu").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].student, "bsmith");
    assert_eq!(rows[0].mentor, "asmith");
    assert_eq!(rows[0].mentor_email, "asmith@umich.edu");
    assert_eq!(rows[0].cohort_name, "Fall Cohort");
}

#[test]
fn multiple_mentors_for_same_missing_student() {
    let input = AuditInput {
        cohorts: vec![cohort(1, "C1", "Fall Cohort")],
        memberships: vec![MembershipRecord::new("jdoe", CohortKey(1))],
        assignments: vec![
            assignment("bsmith", "asmith", "C1"),
            assignment("bsmith", "lgarcia", "C1"),
        ],
    };

    let rows = reconcile(&input, "umich.edu").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].mentor_email, "asmith@umich.edu");
    assert_eq!(rows[1].mentor_email, "lgarcia@umich.edu");
}

#[test]
fn term_discrepancies_in_assignment_order() {
    let rows = reconcile(&term_input(), "umich.edu").unwrap();
    let got: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| (r.student.as_str(), r.mentor.as_str(), r.cohort_name.as_str()))
        .collect();

    assert_eq!(
        got,
        vec![
            ("bchne", "mpatel", "Engineering Fall 2025"),
            ("dnovak", "rkim", "LSA Fall 2025"),
            ("dnovak", "tsato", "LSA Fall 2025"),
            ("fwright", "tsato", "Rackham PhD Candidates"),
        ]
    );
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

#[test]
fn every_discrepancy_is_local_and_not_valid() {
    let input = term_input();
    let rows = reconcile(&input, "umich.edu").unwrap();

    let code_for_key = |key: CohortKey| {
        input
            .cohorts
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.code.clone())
            .unwrap()
    };
    let valid: HashSet<(String, String)> = input
        .memberships
        .iter()
        .map(|m| (m.student.clone(), code_for_key(m.cohort_key)))
        .collect();
    let local: HashSet<(String, String)> = input
        .assignments
        .iter()
        .map(|a| (a.student.clone(), a.cohort_code.clone()))
        .collect();

    for row in &rows {
        let pair = (row.student.clone(), row.cohort_code.clone());
        assert!(local.contains(&pair), "{pair:?} not a local assignment");
        assert!(!valid.contains(&pair), "{pair:?} is a valid membership");
    }

    // And every local pair that is not valid shows up.
    let reported: HashSet<(String, String)> = rows
        .iter()
        .map(|r| (r.student.clone(), r.cohort_code.clone()))
        .collect();
    let expected: HashSet<(String, String)> = local.difference(&valid).cloned().collect();
    assert_eq!(reported, expected);
}

#[test]
fn reconcile_is_idempotent() {
    let input = term_input();
    let first = reconcile(&input, "umich.edu").unwrap();
    let second = reconcile(&input, "umich.edu").unwrap();
    assert_eq!(first, second);
}

#[test]
fn run_summary_tracks_mentors_to_contact() {
    let result = run(&term_input(), "umich.edu").unwrap();
    let s = &result.summary;
    assert_eq!(s.anomalous_cohorts, 3);
    assert_eq!(s.valid_memberships, 5);
    assert_eq!(s.local_assignments, 9);
    assert_eq!(s.discrepancies, 4);
    assert_eq!(s.affected_cohorts, 3);
    assert_eq!(s.affected_mentors, vec!["mpatel", "rkim", "tsato"]);
    assert_eq!(s.per_cohort["LSA-F25"].discrepancies, 2);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["discrepancies"][0]["student"], "bchne");
    assert_eq!(json["summary"]["per_cohort"]["RACKHAM"]["discrepancies"], 1);
}

#[test]
fn conflicting_cohort_metadata_aborts() {
    let mut input = term_input();
    input.cohorts.push(cohort(13, "LSA-F25", "LSA Fall 2025 (dup)"));
    let err = reconcile(&input, "umich.edu").unwrap_err();
    assert!(matches!(err, ReconError::DataShape(_)));
}
