//! On-disk layout of an in-progress transfer

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vsixget_errors::TransferError;
use vsixget_types::ResolvedArtifact;

/// Every path a transfer may touch for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingPaths {
    /// `<label>.vsix`, only ever written by rename
    pub final_path: PathBuf,
    /// Raw wire bytes, kept across runs for resumption
    pub part: PathBuf,
    /// Response metadata sidecar
    pub meta: PathBuf,
    /// Decoded body before the final rename
    pub tmp: PathBuf,
}

impl StagingPaths {
    #[must_use]
    pub fn new(dest_dir: &Path, artifact: &ResolvedArtifact) -> Self {
        let file_name = artifact.file_name();
        Self {
            final_path: dest_dir.join(&file_name),
            part: dest_dir.join(format!("{file_name}.part")),
            meta: dest_dir.join(format!("{file_name}.headers.json")),
            tmp: dest_dir.join(format!("{file_name}.tmp")),
        }
    }
}

/// Response metadata captured separately from the body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_range: Option<String>,
}

impl ResponseMeta {
    #[must_use]
    pub fn from_response(response: &reqwest::Response) -> Self {
        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            status: response.status().as_u16(),
            content_encoding: header(reqwest::header::CONTENT_ENCODING),
            content_length: response.content_length(),
            content_range: header(reqwest::header::CONTENT_RANGE),
        }
    }

    /// Persist next to the staging file
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Filesystem` if the sidecar cannot be written.
    pub async fn write(&self, path: &Path) -> Result<(), TransferError> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| TransferError::Filesystem {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| TransferError::filesystem(path, &e))
    }

    /// Load a sidecar written by [`ResponseMeta::write`]
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Filesystem` if the sidecar is missing or unreadable.
    pub async fn read(path: &Path) -> Result<Self, TransferError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TransferError::filesystem(path, &e))?;
        serde_json::from_slice(&bytes).map_err(|e| TransferError::Filesystem {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Remove a file, treating "already gone" as success
pub(super) async fn remove_if_exists(path: &Path) -> Result<(), TransferError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TransferError::filesystem(path, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsixget_types::PlatformTag;

    #[test]
    fn test_paths_share_the_label() {
        let artifact = ResolvedArtifact {
            publisher: "acme".to_string(),
            package: "widget".to_string(),
            version: "1.0.0".to_string(),
            platform: Some(PlatformTag::LinuxX64),
        };
        let paths = StagingPaths::new(Path::new("/dl"), &artifact);
        assert_eq!(paths.final_path, Path::new("/dl/acme.widget@1.0.0=linux-x64.vsix"));
        assert_eq!(paths.part, Path::new("/dl/acme.widget@1.0.0=linux-x64.vsix.part"));
        assert_ne!(paths.tmp, paths.final_path);
    }

    #[tokio::test]
    async fn test_meta_sidecar_survives_a_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.headers.json");
        let meta = ResponseMeta {
            status: 206,
            content_encoding: Some("gzip".to_string()),
            content_length: Some(10),
            content_range: Some("bytes 5-14/15".to_string()),
        };
        meta.write(&path).await.unwrap();
        assert_eq!(ResponseMeta::read(&path).await.unwrap(), meta);
        remove_if_exists(&path).await.unwrap();
        remove_if_exists(&path).await.unwrap();
    }
}
