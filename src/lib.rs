//! Nightly benchmark status dashboard.
//!
//! Fetches the run-log archive, classifies every run in a trailing window of
//! days, and renders a (variant, host) × date status table.

/// Application directory resolution.
pub mod app_dirs;
/// Branch archive download and extraction.
pub mod archive;
/// TOML configuration.
pub mod config;
pub(crate) mod http_client;
/// Tracing setup.
pub mod logging;
/// HTML, text and JSON output.
pub mod render;
/// Render-cycle orchestration.
pub mod report;
/// Run discovery, validation and pivoting.
pub mod runs;

pub use report::{LogSource, Reporter, StatusError, StatusReport};
pub use runs::{
    DEFAULT_WINDOW_DAYS, RunRecord, RunStatus, RunValidator, StatusTable, Validation,
    collect_run_statuses,
};
