use crate::http_client;

use super::FetchError;

/// Download the archive body into memory with a hard size cap.
///
/// Any non-success status is an error; the body of such a response is never
/// treated as an archive.
pub(super) fn download_archive(url: &str, max_bytes: usize) -> Result<Vec<u8>, FetchError> {
    let response = match http_client::agent().get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            return Err(FetchError::Status {
                url: url.to_string(),
                code,
            });
        }
        Err(err) => {
            return Err(FetchError::Http {
                url: url.to_string(),
                message: err.to_string(),
            });
        }
    };
    let bytes = http_client::read_response_bytes(response, max_bytes).map_err(FetchError::Body)?;
    tracing::debug!(url, bytes = bytes.len(), "Archive downloaded");
    Ok(bytes)
}
