use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{CohortGroup, CohortKey};

/// Anomalous cohorts looked up by warehouse key and by local code.
///
/// Key and code must map one-to-one; anything else means the warehouse
/// returned cohort metadata the two stores cannot agree on.
#[derive(Debug, Default)]
pub struct CohortIndex<'a> {
    by_key: BTreeMap<CohortKey, &'a CohortGroup>,
    by_code: BTreeMap<&'a str, &'a CohortGroup>,
}

impl<'a> CohortIndex<'a> {
    pub fn build(cohorts: &'a [CohortGroup]) -> Result<Self, ReconError> {
        let mut by_key: BTreeMap<CohortKey, &CohortGroup> = BTreeMap::new();
        let mut by_code: BTreeMap<&str, &CohortGroup> = BTreeMap::new();

        for cohort in cohorts {
            if let Some(seen) = by_key.get(&cohort.key) {
                if *seen != cohort {
                    return Err(ReconError::DataShape(format!(
                        "cohort key {} is listed as both '{}' ({}) and '{}' ({})",
                        cohort.key, seen.code, seen.name, cohort.code, cohort.name
                    )));
                }
                continue;
            }
            if let Some(seen) = by_code.get(cohort.code.as_str()) {
                return Err(ReconError::DataShape(format!(
                    "cohort code '{}' is claimed by keys {} and {}",
                    cohort.code, seen.key, cohort.key
                )));
            }
            by_key.insert(cohort.key, cohort);
            by_code.insert(cohort.code.as_str(), cohort);
        }

        Ok(Self { by_key, by_code })
    }

    pub fn by_key(&self, key: CohortKey) -> Option<&'a CohortGroup> {
        self.by_key.get(&key).copied()
    }

    pub fn by_code(&self, code: &str) -> Option<&'a CohortGroup> {
        self.by_code.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
