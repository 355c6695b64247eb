use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use time::{Date, Duration, Month};
use tracing::warn;

use super::ScanError;

/// Run directories are named `YYYYMMDD_<suffix>`.
static RUN_DIR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})_").expect("run directory pattern is valid")
});

/// A directory holding at least one log, found under a dated ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRun {
    pub date: Date,
    pub run_dir: PathBuf,
}

/// `start` followed by the `days - 1` calendar days before it.
pub fn window_dates(start: Date, days: u32) -> Vec<Date> {
    (0..i64::from(days))
        .map_while(|offset| start.checked_sub(Duration::days(offset)))
        .collect()
}

/// Parse the date prefix of a run directory name.
pub(super) fn run_dir_date(name: &str) -> Option<Date> {
    let captures = RUN_DIR_NAME.captures(name)?;
    let year: i32 = captures[1].parse().ok()?;
    let month: u8 = captures[2].parse().ok()?;
    let day: u8 = captures[3].parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Find every directory that holds a `*.log` file somewhere below a run
/// directory dated within `dates`.
///
/// Results are unique per (date, directory), newest date first.
pub fn scan_run_dirs(root: &Path, dates: &[Date]) -> Result<Vec<DiscoveredRun>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }
    let wanted: HashSet<Date> = dates.iter().copied().collect();
    let mut found: BTreeSet<(Reverse<Date>, PathBuf)> = BTreeSet::new();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    visit_log_files(root, &mut |log_path| {
        let Ok(relative) = log_path.strip_prefix(root) else {
            return;
        };
        let Some(run_dir) = log_path.parent() else {
            return;
        };
        let Some(ancestors) = relative.parent() else {
            return;
        };
        for component in ancestors.components() {
            let Some(name) = component.as_os_str().to_str() else {
                continue;
            };
            if let Some(date) = run_dir_date(name)
                && wanted.contains(&date)
            {
                found.insert((Reverse(date), run_dir.to_path_buf()));
            }
        }
    })?;
    Ok(found
        .into_iter()
        .map(|(Reverse(date), run_dir)| DiscoveredRun { date, run_dir })
        .collect())
}

fn visit_log_files(root: &Path, visitor: &mut impl FnMut(&Path)) -> Result<(), ScanError> {
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Some(entries) = read_dir_or_skip(root, &dir)? else {
            continue;
        };
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(
                        dir = %dir.display(),
                        error = %err,
                        "Failed to read directory entry during scan"
                    );
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read file type during scan"
                    );
                    continue;
                }
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            if file_type.is_file() && is_log_file(&path) {
                visitor(&path);
            }
        }
    }
    Ok(())
}

/// List `dir`. Failing to read the root is an error; any deeper directory is
/// warned about and skipped.
fn read_dir_or_skip(root: &Path, dir: &Path) -> Result<Option<fs::ReadDir>, ScanError> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(Some(entries)),
        Err(source) if dir != root => {
            warn!(
                dir = %dir.display(),
                error = %source,
                "Failed to read directory during scan"
            );
            Ok(None)
        }
        Err(source) => Err(ScanError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".log"))
}
