//! Download and unpack the branch archive that holds the nightly run logs.
//!
//! The extracted tree is reused while its freshness stamp is younger than the
//! configured TTL, so repeated renders do not hit the network.

mod cache;
mod download;
mod extract;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Instant, SystemTime},
};

use tracing::{debug, info, warn};

use crate::config::ArchiveSettings;

pub use cache::ArchiveCache;

#[cfg(test)]
pub(crate) use extract::test_zip;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to download {url}: HTTP status {code}")]
    Status { url: String, code: u16 },
    #[error("HTTP error fetching {url}: {message}")]
    Http { url: String, message: String },
    #[error("Failed to read archive body: {0}")]
    Body(std::io::Error),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Zip error: {0}")]
    Zip(String),
    #[error("Invalid archive: {0}")]
    Invalid(String),
    #[error("Archive did not contain {}", .0.display())]
    MissingRoot(PathBuf),
}

/// Scratch directory inside `extract_dir` that receives each new extraction.
const STAGING_DIR_NAME: &str = ".staging";

/// Fetch the archive (or reuse a fresh extraction) and return its root.
///
/// A new archive is unpacked into a staging directory and only moved over the
/// previous tree once extraction succeeded. The stamp is cleared first, so an
/// interrupted fetch is never reused.
pub fn fetch_archive(settings: &ArchiveSettings) -> Result<PathBuf, FetchError> {
    let root = settings.extracted_root();
    if root.is_dir()
        && cache::stamp_is_fresh(
            &settings.extract_dir,
            &settings.url,
            settings.cache_ttl(),
            SystemTime::now(),
        )
    {
        debug!(root = %root.display(), "Reusing extracted archive");
        return Ok(root);
    }

    info!(url = %settings.url, "Downloading archive");
    let started = Instant::now();
    let bytes = download::download_archive(&settings.url, settings.max_archive_bytes)?;

    create_dir_all(&settings.extract_dir)?;
    cache::clear_stamp(&settings.extract_dir)?;
    let staging = settings.extract_dir.join(STAGING_DIR_NAME);
    let installed = install_staged(&bytes, &staging, &settings.archive_root, &root);
    if let Err(err) = remove_dir_if_present(&staging) {
        warn!(dir = %staging.display(), error = %err, "Failed to clean staging directory");
    }
    let written = installed?;
    cache::write_stamp(&settings.extract_dir, &settings.url)?;
    info!(
        root = %root.display(),
        files = written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Archive extracted"
    );
    Ok(root)
}

/// Unpack `bytes` into `staging`, then move its `archive_root` over `root`.
fn install_staged(
    bytes: &[u8],
    staging: &Path,
    archive_root: &str,
    root: &Path,
) -> Result<usize, FetchError> {
    remove_dir_if_present(staging)?;
    let written = extract::unzip_bytes_to_dir(bytes, staging)?;
    let staged_root = staging.join(archive_root);
    if !staged_root.is_dir() {
        return Err(FetchError::MissingRoot(root.to_path_buf()));
    }
    remove_dir_if_present(root)?;
    if let Some(parent) = root.parent() {
        create_dir_all(parent)?;
    }
    fs::rename(&staged_root, root).map_err(|source| FetchError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(written)
}

fn remove_dir_if_present(path: &Path) -> Result<(), FetchError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FetchError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_dir_all(path: &Path) -> Result<(), FetchError> {
    fs::create_dir_all(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}
