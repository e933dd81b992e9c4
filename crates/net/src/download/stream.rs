//! Low-level streaming into the staging file

use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use vsixget_errors::TransferError;

/// How the response body relates to what is already staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteMode {
    /// Body continues the staged bytes
    Append,
    /// Body is the whole artifact; staged bytes are discarded
    Truncate,
}

/// Stream the response body into `part_path`, returning the bytes written
///
/// A chunk that does not arrive within `chunk_timeout` fails the transfer
/// with `TransferError::Timeout`; everything written so far stays staged.
pub(super) async fn stream_to_staging(
    response: reqwest::Response,
    part_path: &Path,
    mode: WriteMode,
    chunk_timeout: Duration,
    url: &str,
) -> Result<u64, TransferError> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Truncate => options.write(true).truncate(true),
    };
    let mut file = options
        .open(part_path)
        .await
        .map_err(|e| TransferError::filesystem(part_path, &e))?;

    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    loop {
        match tokio::time::timeout(chunk_timeout, stream.next()).await {
            Ok(Some(chunk_result)) => {
                let chunk = chunk_result.map_err(|e| {
                    if e.is_timeout() {
                        TransferError::Timeout {
                            url: url.to_string(),
                        }
                    } else {
                        TransferError::Network {
                            url: url.to_string(),
                            message: e.to_string(),
                        }
                    }
                })?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| TransferError::filesystem(part_path, &e))?;
                written += chunk.len() as u64;
            }
            Ok(None) => break,
            Err(_) => {
                // Keep what arrived so the next attempt can resume
                let _ = file.flush().await;
                return Err(TransferError::Timeout {
                    url: url.to_string(),
                });
            }
        }
    }

    file.flush()
        .await
        .map_err(|e| TransferError::filesystem(part_path, &e))?;
    Ok(written)
}
