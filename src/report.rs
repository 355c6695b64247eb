//! One render cycle: resolve the log tree, collect statuses, build page meta.

use std::path::{Path, PathBuf};

use time::{Date, OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::archive::{self, ArchiveCache, FetchError};
use crate::config::{ConfigError, StatusConfig};
use crate::render::PageMeta;
use crate::runs::{self, LogValidator, RunRecord, RunValidator, ScanError, StatusTable};

/// Errors surfaced at the crate boundary.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where the log tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    /// Fetch (or reuse) the configured branch archive.
    Archive,
    /// Scan an existing directory.
    Local(PathBuf),
}

impl LogSource {
    pub fn from_config(config: &StatusConfig) -> Self {
        match &config.scan.root {
            Some(root) => Self::Local(root.clone()),
            None => Self::Archive,
        }
    }
}

/// Everything needed to render one page.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub root: PathBuf,
    pub start: Date,
    pub records: Vec<RunRecord>,
    pub table: StatusTable,
}

/// Resolves the log tree and builds reports, reusing the archive between
/// calls while it is fresh.
pub struct Reporter {
    config: StatusConfig,
    source: LogSource,
    cache: ArchiveCache,
    validator: Box<dyn RunValidator>,
}

impl Reporter {
    pub fn new(config: StatusConfig, source: LogSource) -> Self {
        let validator = Box::new(LogValidator::new(&config.validation));
        Self::with_validator(config, source, validator)
    }

    /// Use a different run validator than the log-based default.
    pub fn with_validator(
        config: StatusConfig,
        source: LogSource,
        validator: Box<dyn RunValidator>,
    ) -> Self {
        let cache = ArchiveCache::new(config.archive.cache_ttl());
        Self {
            config,
            source,
            cache,
            validator,
        }
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Directory the scan starts from, fetching the archive when needed.
    pub fn resolve_root(&mut self) -> Result<PathBuf, FetchError> {
        match &self.source {
            LogSource::Local(root) => Ok(root.clone()),
            LogSource::Archive => {
                let settings = &self.config.archive;
                self.cache.get_or_fetch(|| archive::fetch_archive(settings))
            }
        }
    }

    /// Build the report for the window ending at `start`.
    pub fn build(&mut self, start: Date) -> Result<StatusReport, StatusError> {
        let root = self.resolve_root()?;
        let scanned =
            runs::collect_run_records(&root, start, self.config.scan.days, self.validator.as_ref());
        let records = match scanned {
            Ok(records) => records,
            Err(err) => {
                // The extracted tree may have been removed underneath us.
                if self.source == LogSource::Archive {
                    self.cache.invalidate();
                }
                return Err(err.into());
            }
        };
        let table = StatusTable::from_records(&records);
        tracing::info!(
            root = %root.display(),
            runs = records.len(),
            rows = table.rows().len(),
            "Built status report"
        );
        Ok(StatusReport {
            root,
            start,
            records,
            table,
        })
    }

    /// Page details for a report generated at `now`.
    pub fn page_meta(&self, report: &StatusReport, now: OffsetDateTime) -> PageMeta {
        let source = match &self.source {
            LogSource::Local(root) => root.display().to_string(),
            LogSource::Archive => self.config.archive.url.clone(),
        };
        PageMeta {
            title: self.config.page.title.clone(),
            generated_at: format_timestamp(now),
            source: format!(
                "{source} ({} days to {})",
                self.config.scan.days,
                runs::format_date(report.start)
            ),
            refresh_secs: self.config.page.refresh_secs,
        }
    }
}

fn format_timestamp(now: OffsetDateTime) -> String {
    const FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    now.format(FORMAT).unwrap_or_else(|_| now.to_string())
}

/// Write rendered output to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<(), StatusError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StatusError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| StatusError::Write {
        path: path.to_path_buf(),
        source,
    })
}
