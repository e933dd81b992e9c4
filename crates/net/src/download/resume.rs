//! Resumable transfer logic

use std::path::Path;
use tokio::fs as tokio_fs;
use vsixget_errors::TransferError;

/// Get the offset for resuming a transfer from its staging file
///
/// # Errors
///
/// Returns an error if the staging file exists but cannot be inspected.
pub(super) async fn get_resume_offset(part_path: &Path) -> Result<u64, TransferError> {
    match tokio_fs::metadata(part_path).await {
        Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
        Ok(_) => Err(TransferError::Filesystem {
            path: part_path.display().to_string(),
            message: "staging path is not a regular file".to_string(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(TransferError::filesystem(part_path, &e)),
    }
}
