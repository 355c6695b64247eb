use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime},
};

use super::FetchError;

const STAMP_FILE_NAME: &str = ".fetched-at";

/// Path of the freshness stamp written after each successful extraction.
pub(super) fn stamp_path(extract_dir: &Path) -> PathBuf {
    extract_dir.join(STAMP_FILE_NAME)
}

/// True when the stamp was written for `url` less than `ttl` before `now`.
pub(super) fn stamp_is_fresh(
    extract_dir: &Path,
    url: &str,
    ttl: Duration,
    now: SystemTime,
) -> bool {
    let path = stamp_path(extract_dir);
    let Ok(contents) = fs::read_to_string(&path) else {
        return false;
    };
    if contents.lines().nth(1) != Some(url) {
        return false;
    }
    let Ok(modified) = fs::metadata(&path).and_then(|meta| meta.modified()) else {
        return false;
    };
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        // A stamp from the future means the clock moved; refetch.
        Err(_) => false,
    }
}

/// Record a completed extraction of `url`: seconds since the epoch, then the url.
pub(super) fn write_stamp(extract_dir: &Path, url: &str) -> Result<(), FetchError> {
    let path = stamp_path(extract_dir);
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    fs::write(&path, format!("{secs}\n{url}\n"))
        .map_err(|source| FetchError::Io { path, source })
}

/// Drop the stamp before the extracted tree is touched.
pub(super) fn clear_stamp(extract_dir: &Path) -> Result<(), FetchError> {
    let path = stamp_path(extract_dir);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FetchError::Io { path, source }),
    }
}

/// In-process memo of the extracted archive root.
///
/// Long-running callers (the `watch` loop) keep one of these so renders
/// inside the TTL skip even the stamp lookup.
#[derive(Debug)]
pub struct ArchiveCache {
    ttl: Duration,
    entry: Option<(Instant, PathBuf)>,
}

impl ArchiveCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Return the cached root, or run `fetch` and remember its result.
    pub fn get_or_fetch<F>(&mut self, fetch: F) -> Result<PathBuf, FetchError>
    where
        F: FnOnce() -> Result<PathBuf, FetchError>,
    {
        self.get_or_fetch_at(Instant::now(), fetch)
    }

    fn get_or_fetch_at<F>(&mut self, now: Instant, fetch: F) -> Result<PathBuf, FetchError>
    where
        F: FnOnce() -> Result<PathBuf, FetchError>,
    {
        if let Some((fetched_at, root)) = &self.entry
            && now.saturating_duration_since(*fetched_at) < self.ttl
        {
            return Ok(root.clone());
        }
        let root = fetch()?;
        self.entry = Some((now, root.clone()));
        Ok(root)
    }

    /// Forget the cached root so the next call fetches again.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
