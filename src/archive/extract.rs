use std::{
    fs::File,
    io::{Cursor, Read, Seek},
    path::Path,
};

use super::FetchError;

const MAX_ZIP_ENTRIES: usize = 200_000;
const MAX_ZIP_ENTRY_UNCOMPRESSED_BYTES: u64 = 512 * 1024 * 1024;
const MAX_ZIP_TOTAL_UNCOMPRESSED_BYTES: u64 = 4 * 1024 * 1024 * 1024;
// Benchmark logs and JSON results compress far better than binaries do.
const MAX_ZIP_COMPRESSION_RATIO: u64 = 1_000;

#[derive(Clone, Copy)]
pub(super) struct ZipExtractionLimits {
    pub(super) max_entries: usize,
    pub(super) max_entry_uncompressed_bytes: u64,
    pub(super) max_total_uncompressed_bytes: u64,
    pub(super) max_compression_ratio: u64,
}

impl ZipExtractionLimits {
    pub(super) fn standard() -> Self {
        Self {
            max_entries: MAX_ZIP_ENTRIES,
            max_entry_uncompressed_bytes: MAX_ZIP_ENTRY_UNCOMPRESSED_BYTES,
            max_total_uncompressed_bytes: MAX_ZIP_TOTAL_UNCOMPRESSED_BYTES,
            max_compression_ratio: MAX_ZIP_COMPRESSION_RATIO,
        }
    }
}

/// Extract an in-memory zip archive into `dest_dir` with the standard limits.
pub(super) fn unzip_bytes_to_dir(bytes: &[u8], dest_dir: &Path) -> Result<usize, FetchError> {
    unzip_to_dir_with_limits(Cursor::new(bytes), dest_dir, ZipExtractionLimits::standard())
}

/// Extract every entry of `reader` into `dest_dir`, returning the number of
/// files written. Entries whose names escape `dest_dir` are skipped.
pub(super) fn unzip_to_dir_with_limits<R: Read + Seek>(
    reader: R,
    dest_dir: &Path,
    limits: ZipExtractionLimits,
) -> Result<usize, FetchError> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|err| FetchError::Zip(err.to_string()))?;
    let entry_count = archive.len();
    if entry_count > limits.max_entries {
        return Err(FetchError::Invalid(format!(
            "Archive has {entry_count} entries, limit is {}",
            limits.max_entries
        )));
    }
    let mut total_uncompressed: u64 = 0;
    let mut written = 0usize;
    for i in 0..entry_count {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| FetchError::Zip(err.to_string()))?;
        let uncompressed_size = entry.size();
        if uncompressed_size > limits.max_entry_uncompressed_bytes {
            return Err(FetchError::Invalid(format!(
                "Archive entry '{}' is too large ({} bytes, limit {})",
                entry.name(),
                uncompressed_size,
                limits.max_entry_uncompressed_bytes
            )));
        }
        if uncompressed_size > 0 {
            let compressed_size = entry.compressed_size();
            if compressed_size == 0 {
                return Err(FetchError::Invalid(format!(
                    "Archive entry '{}' has zero compressed size",
                    entry.name()
                )));
            }
            if uncompressed_size > compressed_size.saturating_mul(limits.max_compression_ratio) {
                return Err(FetchError::Invalid(format!(
                    "Archive entry '{}' exceeds compression ratio limit",
                    entry.name()
                )));
            }
        }
        total_uncompressed = total_uncompressed
            .checked_add(uncompressed_size)
            .ok_or_else(|| FetchError::Invalid("Archive size overflow".into()))?;
        if total_uncompressed > limits.max_total_uncompressed_bytes {
            return Err(FetchError::Invalid(format!(
                "Archive extracted size {} exceeds limit {}",
                total_uncompressed, limits.max_total_uncompressed_bytes
            )));
        }
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(entry = entry.name(), "Skipping archive entry outside destination");
            continue;
        };
        let outpath = dest_dir.join(relative);
        if entry.is_dir() {
            create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath).map_err(|source| FetchError::Io {
            path: outpath.clone(),
            source,
        })?;
        std::io::copy(&mut entry, &mut outfile).map_err(|source| FetchError::Io {
            path: outpath.clone(),
            source,
        })?;
        written += 1;
    }
    Ok(written)
}

fn create_dir_all(path: &Path) -> Result<(), FetchError> {
    std::fs::create_dir_all(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })
}
