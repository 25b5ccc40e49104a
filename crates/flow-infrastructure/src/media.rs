//! Probing local video files before upload.

use std::fs;
use std::path::Path;

use flow_core::error::{FlowError, Result};
use flow_core::video::{UploadCandidate, INVALID_TYPE_MESSAGE};

/// Inspects a local file and builds an [`UploadCandidate`] from it.
///
/// The MIME type comes from the file extension, which is what the upload
/// whitelist is written against. Reading the bytes happens later, after
/// validation has passed.
pub fn probe_video(path: &Path) -> Result<UploadCandidate> {
    let metadata = fs::metadata(path)?;
    if metadata.is_dir() {
        return Err(FlowError::validation(INVALID_TYPE_MESSAGE));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| FlowError::io("Path has no file name"))?
        .to_string_lossy()
        .into_owned();

    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(UploadCandidate {
        filename,
        mime_type,
        size_bytes: metadata.len(),
    })
}
