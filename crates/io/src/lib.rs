// Database sources and report output

pub mod error;
pub mod local;
pub mod pipeline;
pub mod report;
pub mod source;
mod sqlite;
pub mod warehouse;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{ReportError, SourceError};
pub use local::LocalStore;
pub use pipeline::{gather, gather_from_config};
pub use report::{write_report, write_report_to, REPORT_HEADER};
pub use source::{AuthoritativeSource, LocalSource};
pub use warehouse::Warehouse;
