//! `cohort-audit-recon` - Cohort membership reconciliation engine.
//!
//! Pure engine crate: receives the rows both stores returned, reports the
//! local mentor assignments that point at students the warehouse cannot
//! resolve. No database or file IO.

pub mod engine;
pub mod error;
pub mod evidence;
pub mod index;
pub mod model;

pub use engine::{contact_address, reconcile, run};
pub use error::ReconError;
pub use model::{
    AuditInput, AuditResult, CohortGroup, CohortKey, Discrepancy, MembershipRecord,
    MentorAssignment,
};
