//! Picks up a document from disk before it is attached
//!
//! Nothing is transferred anywhere. The file is checked against the size
//! limit and the accepted types, and its metadata becomes the
//! [`DocumentMeta`] the tracker records once the simulated upload finishes.

use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::error::UploadError;
use crate::state::DocumentMeta;

/// Accepted extensions and the mime type recorded for each
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

/// Mime type for an accepted file extension
pub fn mime_for(path: &Path) -> Result<&'static str, UploadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    ACCEPTED_TYPES
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
        .ok_or(UploadError::UnsupportedType(ext))
}

/// Validate `path` and describe it; the tracker is not touched
pub fn stage_upload(path: &Path, max_bytes: u64) -> Result<DocumentMeta, UploadError> {
    let metadata = fs::metadata(path).map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(UploadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let byte_size = metadata.len();
    if byte_size > max_bytes {
        tracing::info!(
            "Rejected {}: {} bytes exceeds {} byte limit",
            path.display(),
            byte_size,
            max_bytes
        );
        return Err(UploadError::TooLarge {
            size: byte_size,
            limit: max_bytes,
        });
    }

    let mime_type = mime_for(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(DocumentMeta {
        name,
        byte_size,
        mime_type: mime_type.to_string(),
        upload_timestamp: Utc::now(),
    })
}
