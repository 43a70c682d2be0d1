use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Source rows that cannot be reconciled as a whole (conflicting cohort
    /// metadata, memberships outside the anomalous set).
    #[error("data shape error: {0}")]
    DataShape(String),
}
