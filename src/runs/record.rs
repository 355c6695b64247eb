use std::path::Path;

use super::{DiscoveredRun, RunRecord, Validation};

/// Placeholder for a host or variant that cannot be derived from the log path.
pub const UNKNOWN: &str = "unknown";

/// Benchmark variant encoded in a log file name: the name without its last
/// three dot-separated extensions.
///
/// `5.1.0+trunk.orun.summary.log` is variant `5.1.0+trunk`. Names with fewer
/// dots keep everything before the first one.
pub fn variant_from_file_name(name: &str) -> String {
    let mut rest = name;
    for _ in 0..3 {
        match rest.rfind('.') {
            Some(idx) => rest = &rest[..idx],
            None => break,
        }
    }
    rest.to_string()
}

/// Host that produced a log: the second path component below the scan root
/// (`<kind>/<host>/...`). `None` if the log is not under the root or the path
/// is too shallow.
pub fn host_from_log_path(root: &Path, log_file: &Path) -> Option<String> {
    let relative = log_file.strip_prefix(root).ok()?;
    let mut components = relative.components();
    components.next()?;
    let host = components.next()?;
    // A two-component path is `<kind>/<file>`; the file is not a host.
    components.next()?;
    host.as_os_str().to_str().map(str::to_string)
}

pub(super) fn build_record(root: &Path, run: DiscoveredRun, validation: Validation) -> RunRecord {
    let Validation { status, log_file } = validation;
    let log_name = log_file
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map(str::to_string);
    let variant = log_name
        .as_deref()
        .map(variant_from_file_name)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let host = log_file
        .as_deref()
        .and_then(|log_file| host_from_log_path(root, log_file))
        .unwrap_or_else(|| UNKNOWN.to_string());
    RunRecord {
        status,
        date: run.date,
        log_name,
        host,
        log_file,
        variant,
        run_dir: run.run_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::RunStatus;
    use std::path::PathBuf;
    use time::macros::date;

    #[test]
    fn variant_strips_three_extensions() {
        assert_eq!(variant_from_file_name("5.1.0+trunk.orun.summary.log"), "5.1.0+trunk");
        assert_eq!(
            variant_from_file_name("5.1.0+trunk+decouple.orun.summary.log"),
            "5.1.0+trunk+decouple"
        );
        assert_eq!(variant_from_file_name("run.summary.log"), "run");
        assert_eq!(variant_from_file_name("run.log"), "run");
        assert_eq!(variant_from_file_name("run"), "run");
    }

    #[test]
    fn host_is_second_component_below_root() {
        let root = Path::new("/data/sandmark");
        assert_eq!(
            host_from_log_path(root, Path::new("/data/sandmark/sequential/navajo/20240301_0/a.log")),
            Some("navajo".to_string())
        );
        assert_eq!(host_from_log_path(root, Path::new("/data/sandmark/sequential/a.log")), None);
        assert_eq!(host_from_log_path(root, Path::new("/elsewhere/x/y/a.log")), None);
    }

    #[test]
    fn record_without_log_is_unknown() {
        let run = DiscoveredRun {
            date: date!(2024 - 03 - 01),
            run_dir: PathBuf::from("/data/sandmark/sequential/navajo/20240301_0"),
        };
        let record = build_record(
            Path::new("/data/sandmark"),
            run,
            Validation {
                status: RunStatus::MissingLog,
                log_file: None,
            },
        );
        assert_eq!(record.host, UNKNOWN);
        assert_eq!(record.variant, UNKNOWN);
        assert_eq!(record.log_name, None);
        assert_eq!(record.status, RunStatus::MissingLog);
    }

    #[test]
    fn record_derives_variant_and_host_from_log() {
        let log = PathBuf::from("/data/sandmark/sequential/navajo/20240301_0/abc/5.1.0+trunk.orun.summary.log");
        let run = DiscoveredRun {
            date: date!(2024 - 03 - 01),
            run_dir: log.parent().unwrap().to_path_buf(),
        };
        let record = build_record(
            Path::new("/data/sandmark"),
            run,
            Validation {
                status: RunStatus::Success,
                log_file: Some(log.clone()),
            },
        );
        assert_eq!(record.host, "navajo");
        assert_eq!(record.variant, "5.1.0+trunk");
        assert_eq!(record.log_name.as_deref(), Some("5.1.0+trunk.orun.summary.log"));
        assert_eq!(record.log_file, Some(log));
    }
}
