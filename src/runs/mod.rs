//! Discover nightly runs under a log tree, classify them, and pivot the
//! results into a (variant, host) × date status table.

mod pivot;
mod record;
mod scan;
mod validate;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};
use time::Date;
use tracing::{debug, info};

pub use pivot::{StatusRow, StatusTable};
pub use record::{UNKNOWN, host_from_log_path, variant_from_file_name};
pub use scan::{DiscoveredRun, scan_run_dirs, window_dates};
pub use validate::{LogValidator, RunValidator, Validation};

/// Number of calendar days covered by a status page.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan root {} is not a directory", .0.display())]
    InvalidRoot(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Outcome of validating one run directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Success,
    Failed,
    Incomplete,
    MissingLog,
    /// Status reported by a custom validator.
    Other(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Incomplete => "incomplete",
            Self::MissingLog => "missing-log",
            Self::Other(status) => status,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            "failed" => Self::Failed,
            "incomplete" => Self::Incomplete,
            "missing-log" => Self::MissingLog,
            _ => Self::Other(value),
        }
    }
}

impl From<RunStatus> for String {
    fn from(value: RunStatus) -> Self {
        value.as_str().to_string()
    }
}

/// One discovered run directory after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub status: RunStatus,
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub log_name: Option<String>,
    pub host: String,
    pub log_file: Option<PathBuf>,
    pub variant: String,
    pub run_dir: PathBuf,
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

/// Validate every run found in the `days`-long window ending at `start`.
pub fn collect_run_records<V>(
    root: &Path,
    start: Date,
    days: u32,
    validator: &V,
) -> Result<Vec<RunRecord>, ScanError>
where
    V: RunValidator + ?Sized,
{
    let dates = window_dates(start, days);
    let discovered = scan_run_dirs(root, &dates)?;
    debug!(root = %root.display(), runs = discovered.len(), "Scanned log tree");
    let records = discovered
        .into_iter()
        .map(|run| {
            let validation = validator.is_valid(&run.run_dir);
            record::build_record(root, run, validation)
        })
        .collect::<Vec<_>>();
    Ok(records)
}

/// Scan, validate and pivot the runs of the window ending at `start`.
pub fn collect_run_statuses<V>(
    root: &Path,
    start: Date,
    days: u32,
    validator: &V,
) -> Result<StatusTable, ScanError>
where
    V: RunValidator + ?Sized,
{
    let records = collect_run_records(root, start, days, validator)?;
    let table = StatusTable::from_records(&records);
    info!(
        runs = records.len(),
        rows = table.rows().len(),
        dates = table.dates().len(),
        "Collected run statuses"
    );
    Ok(table)
}
