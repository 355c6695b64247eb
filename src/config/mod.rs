//! TOML configuration for the archive source, scan window, validation rules
//! and page output.
//!
//! Every key is optional. A missing file yields the defaults, which point at
//! the sandmark-nightly `testing` branch.

mod defaults;
mod load;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::AppDirError;

use defaults::{
    clamp_days, default_archive_root, default_archive_url, default_cache_ttl_secs, default_days,
    default_error_markers, default_extract_dir, default_max_archive_bytes, default_summary_suffix,
    default_title,
};

pub use load::{CONFIG_FILE_NAME, config_path, load_from, load_or_default};

/// Full tool configuration.
///
/// Config keys (TOML): `[archive]`, `[scan]`, `[validation]`, `[page]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub page: PageSettings,
}

impl StatusConfig {
    pub(crate) fn normalized(mut self) -> Self {
        self.scan.days = clamp_days(self.scan.days);
        if self.archive.archive_root.trim().is_empty() {
            self.archive.archive_root = default_archive_root();
        }
        if self.archive.max_archive_bytes == 0 {
            self.archive.max_archive_bytes = default_max_archive_bytes();
        }
        self.validation
            .error_markers
            .retain(|marker| !marker.trim().is_empty());
        self
    }

    /// Override the scan window, keeping it inside the supported range.
    pub fn set_days(&mut self, days: u32) {
        self.scan.days = clamp_days(days);
    }
}

/// Where the branch archive comes from and where it is unpacked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSettings {
    #[serde(default = "default_archive_url")]
    pub url: String,
    #[serde(default = "default_extract_dir")]
    pub extract_dir: PathBuf,
    /// Top-level directory inside the zip (`<repo>-<branch>` for GitHub).
    #[serde(default = "default_archive_root")]
    pub archive_root: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_archive_bytes")]
    pub max_archive_bytes: usize,
}

impl ArchiveSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Directory the scan starts from once the archive is extracted.
    pub fn extracted_root(&self) -> PathBuf {
        self.extract_dir.join(&self.archive_root)
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            url: default_archive_url(),
            extract_dir: default_extract_dir(),
            archive_root: default_archive_root(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_archive_bytes: default_max_archive_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Number of calendar days to look back, including the start date.
    #[serde(default = "default_days")]
    pub days: u32,
    /// Scan a local tree instead of fetching the archive.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            days: default_days(),
            root: None,
        }
    }
}

/// Rules used by the default log-based run validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Substrings that mark a log line as a failure.
    #[serde(default = "default_error_markers")]
    pub error_markers: Vec<String>,
    /// Suffix of the results file a finished run leaves behind.
    #[serde(default = "default_summary_suffix")]
    pub summary_suffix: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            error_markers: default_error_markers(),
            summary_suffix: default_summary_suffix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default = "default_title")]
    pub title: String,
    /// Emit a meta refresh tag with this period.
    #[serde(default)]
    pub refresh_secs: Option<u64>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            refresh_secs: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    AppDir(#[from] AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}
