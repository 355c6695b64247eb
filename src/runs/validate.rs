use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::config::ValidationSettings;

use super::RunStatus;

/// Classification of a single run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub status: RunStatus,
    /// Log the status was derived from, if the run has one.
    pub log_file: Option<PathBuf>,
}

/// Decides whether a run directory holds a valid nightly run.
pub trait RunValidator {
    fn is_valid(&self, run_dir: &Path) -> Validation;
}

impl<F> RunValidator for F
where
    F: Fn(&Path) -> Validation,
{
    fn is_valid(&self, run_dir: &Path) -> Validation {
        self(run_dir)
    }
}

/// Default validator that reads the run's log and looks for its results file.
///
/// - no `*.log` in the directory: `missing-log`
/// - a log line containing an error marker, or an unreadable log: `failed`
/// - a non-empty results file with the summary suffix: `success`
/// - otherwise: `incomplete`
#[derive(Debug, Clone)]
pub struct LogValidator {
    error_markers: Vec<String>,
    summary_suffix: String,
}

impl LogValidator {
    pub fn new(settings: &ValidationSettings) -> Self {
        Self {
            error_markers: settings.error_markers.clone(),
            summary_suffix: settings.summary_suffix.clone(),
        }
    }

    fn log_has_error(&self, text: &str) -> bool {
        text.lines().any(|line| {
            self.error_markers
                .iter()
                .any(|marker| line.contains(marker.as_str()))
        })
    }

    fn has_summary(&self, files: &[(String, u64)]) -> bool {
        files
            .iter()
            .any(|(name, len)| *len > 0 && name.ends_with(self.summary_suffix.as_str()))
    }

    /// Classify `run_dir` from a listing of its files taken beforehand.
    fn classify(&self, run_dir: &Path, files: &[(String, u64)]) -> Validation {
        let Some(log_name) = files
            .iter()
            .map(|(name, _)| name)
            .filter(|name| name.ends_with(".log"))
            .max()
        else {
            return Validation {
                status: RunStatus::MissingLog,
                log_file: None,
            };
        };
        let log_file = run_dir.join(log_name);
        let status = match fs::read(&log_file) {
            Ok(bytes) if self.log_has_error(&String::from_utf8_lossy(&bytes)) => RunStatus::Failed,
            Ok(_) if self.has_summary(files) => RunStatus::Success,
            Ok(_) => RunStatus::Incomplete,
            Err(err) => {
                warn!(path = %log_file.display(), error = %err, "Failed to read run log");
                RunStatus::Failed
            }
        };
        Validation {
            status,
            log_file: Some(log_file),
        }
    }
}

impl Default for LogValidator {
    fn default() -> Self {
        Self::new(&ValidationSettings::default())
    }
}

impl RunValidator for LogValidator {
    fn is_valid(&self, run_dir: &Path) -> Validation {
        self.classify(run_dir, &list_files(run_dir))
    }
}

/// Regular files directly inside `dir` with their sizes.
fn list_files(dir: &Path) -> Vec<(String, u64)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "Failed to list run directory");
            return Vec::new();
        }
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !meta.is_file() {
                return None;
            }
            let name = entry.file_name().into_string().ok()?;
            Some((name, meta.len()))
        })
        .collect()
}
