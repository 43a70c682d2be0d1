// CSV discrepancy report

use std::io::Write;
use std::path::Path;

use cohort_audit_recon::model::Discrepancy;

use crate::error::ReportError;

/// Fixed column order of the report.
pub const REPORT_HEADER: [&str; 4] = ["Student", "Advisor", "Advisor Email", "Cohort Name"];

/// Write the report to `path`, replacing any existing file.
///
/// Rows go to a sibling `.tmp` file that is renamed over `path` once
/// complete, so a failed write leaves the previous report in place.
pub fn write_report(discrepancies: &[Discrepancy], path: &Path) -> Result<(), ReportError> {
    let to_err = |source: csv::Error| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = path.with_extension("csv.tmp");
    let written = std::fs::File::create(&tmp_path)
        .map_err(csv::Error::from)
        .and_then(|file| write_report_to(discrepancies, file))
        .and_then(|()| std::fs::rename(&tmp_path, path).map_err(csv::Error::from));

    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(to_err(e));
    }

    tracing::info!(path = %path.display(), rows = discrepancies.len(), "report written");
    Ok(())
}

/// Header row, then one record per discrepancy. No index column.
pub fn write_report_to<W: Write>(discrepancies: &[Discrepancy], writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(REPORT_HEADER)?;
    for d in discrepancies {
        writer.write_record([
            d.student.as_str(),
            d.mentor.as_str(),
            d.mentor_email.as_str(),
            d.cohort_name.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
