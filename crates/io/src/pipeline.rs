//! Staged input gathering.
//!
//! Connect(warehouse) -> anomalous cohorts -> valid memberships ->
//! Disconnect(warehouse) -> Connect(local) -> assignments -> Disconnect(local).
//!
//! Exactly one connection is open at a time. Each is owned by a block scope,
//! so it is dropped (and closed) before the next stage, on the error path as
//! well as on success.

use std::collections::BTreeSet;

use cohort_audit_config::SourceConfig;
use cohort_audit_recon::model::{AuditInput, CohortKey};

use crate::error::SourceError;
use crate::local::LocalStore;
use crate::source::{AuthoritativeSource, LocalSource};
use crate::warehouse::Warehouse;

/// Gather everything the engine needs from both stores.
///
/// With no anomalous cohorts there is nothing to reconcile: that is a
/// `DataShape` error unless `allow_empty` is set, in which case the local
/// store is never opened and an empty input comes back.
pub fn gather<A, L>(
    open_warehouse: impl FnOnce() -> Result<A, SourceError>,
    open_local: impl FnOnce() -> Result<L, SourceError>,
    allow_empty: bool,
) -> Result<AuditInput, SourceError>
where
    A: AuthoritativeSource,
    L: LocalSource,
{
    let (cohorts, memberships) = {
        let warehouse = open_warehouse()?;
        let cohorts = warehouse.find_anomalous_cohorts()?;
        tracing::info!(cohorts = cohorts.len(), "anomalous cohorts found");

        if cohorts.is_empty() {
            if allow_empty {
                return Ok(AuditInput::default());
            }
            return Err(SourceError::DataShape(
                "the warehouse reports no anomalous cohorts; nothing to reconcile".into(),
            ));
        }

        let keys: BTreeSet<CohortKey> = cohorts.iter().map(|c| c.key).collect();
        let memberships = warehouse.find_valid_memberships(&keys)?;
        tracing::info!(memberships = memberships.len(), "valid memberships fetched");
        (cohorts, memberships)
    };

    let assignments = {
        let local = open_local()?;
        let codes: BTreeSet<String> = cohorts.iter().map(|c| c.code.clone()).collect();
        let assignments = local.find_assignments(&codes)?;
        tracing::info!(assignments = assignments.len(), "local assignments fetched");
        assignments
    };

    Ok(AuditInput { cohorts, memberships, assignments })
}

/// [`gather`] against the SQLite backends.
pub fn gather_from_config(
    warehouse: &SourceConfig,
    local: &SourceConfig,
    allow_empty: bool,
) -> Result<AuditInput, SourceError> {
    gather(
        || Warehouse::connect(warehouse),
        || LocalStore::connect(local),
        allow_empty,
    )
}
