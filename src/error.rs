use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while assembling or exporting a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The requested report kind is not one of the six known kinds
    #[error("unrecognized report kind: {0}")]
    InvalidReportKind(String),

    /// A summary figure or collection is absent from the snapshot
    #[error("snapshot is missing required field: {0}")]
    MissingSnapshotField(&'static str),

    /// The host cannot create a downloadable file
    #[error("export unavailable: {0}")]
    ExportUnavailable(String),

    /// Custom range with a start after its end
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, ReportError>;
