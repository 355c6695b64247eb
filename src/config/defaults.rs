use std::path::PathBuf;

pub(super) const MIN_WINDOW_DAYS: u32 = 1;
pub(super) const MAX_WINDOW_DAYS: u32 = 60;

pub(super) fn clamp_days(days: u32) -> u32 {
    days.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS)
}

pub(super) fn default_archive_url() -> String {
    "https://github.com/ocaml-bench/sandmark-nightly/archive/refs/heads/testing.zip".to_string()
}

pub(super) fn default_extract_dir() -> PathBuf {
    PathBuf::from("/tmp/sandmark-nightly-testing-branch")
}

pub(super) fn default_archive_root() -> String {
    "sandmark-nightly-testing".to_string()
}

pub(super) fn default_cache_ttl_secs() -> u64 {
    300
}

pub(super) fn default_max_archive_bytes() -> usize {
    512 * 1024 * 1024
}

pub(super) fn default_days() -> u32 {
    crate::runs::DEFAULT_WINDOW_DAYS
}

pub(super) fn default_error_markers() -> Vec<String> {
    ["Fatal error", "Exception", "Error:", "FAILED"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(super) fn default_summary_suffix() -> String {
    ".summary.bench".to_string()
}

pub(super) fn default_title() -> String {
    "Sandmark Nightly Build Status".to_string()
}
