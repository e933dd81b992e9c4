//! URL construction and HTTP response validation for transfers

use reqwest::StatusCode;
use url::Url;
use vsixget_errors::TransferError;
use vsixget_types::ResolvedArtifact;

use super::stream::WriteMode;

/// Deterministic download URL for an artifact
///
/// `{gallery}/publishers/{publisher}/vsextensions/{package}/{version}/vspackage`,
/// with `targetPlatform` as a query parameter when the artifact has one.
///
/// # Errors
///
/// Returns `TransferError::InvalidUrl` if the gallery URL is not an
/// absolute http(s) URL.
pub fn download_url(gallery_url: &str, artifact: &ResolvedArtifact) -> Result<Url, TransferError> {
    let mut url = crate::parse_url(gallery_url.trim_end_matches('/'))?;
    validate_scheme(&url)?;

    url.path_segments_mut()
        .map_err(|()| TransferError::InvalidUrl(gallery_url.to_string()))?
        .pop_if_empty()
        .extend([
            "publishers",
            artifact.publisher.as_str(),
            "vsextensions",
            artifact.package.as_str(),
            artifact.version.as_str(),
            "vspackage",
        ]);

    if let Some(platform) = artifact.platform {
        url.query_pairs_mut()
            .append_pair("targetPlatform", platform.as_str());
    }
    Ok(url)
}

fn validate_scheme(url: &Url) -> Result<(), TransferError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(TransferError::InvalidUrl(format!(
            "unsupported scheme '{scheme}' in {url}"
        ))),
    }
}

/// What to do with a response, given how many bytes were already staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ResponseAction {
    Write(WriteMode),
    /// 416: staged bytes are unusable; discard and ask again without a range
    DiscardAndRestart,
}

/// Validate HTTP response for a transfer
pub(super) fn validate_response(
    status: StatusCode,
    resume_offset: u64,
    url: &str,
) -> Result<ResponseAction, TransferError> {
    match status {
        StatusCode::PARTIAL_CONTENT if resume_offset > 0 => {
            Ok(ResponseAction::Write(WriteMode::Append))
        }
        StatusCode::RANGE_NOT_SATISFIABLE if resume_offset > 0 => {
            Ok(ResponseAction::DiscardAndRestart)
        }
        // Range ignored or never requested
        s if s.is_success() => Ok(ResponseAction::Write(WriteMode::Truncate)),
        s => Err(TransferError::HttpStatus {
            url: url.to_string(),
            status: s.as_u16(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsixget_types::PlatformTag;

    fn artifact(platform: Option<PlatformTag>) -> ResolvedArtifact {
        ResolvedArtifact {
            publisher: "acme".to_string(),
            package: "widget".to_string(),
            version: "2.0.0".to_string(),
            platform,
        }
    }

    #[test]
    fn test_download_url_with_platform() {
        let url = download_url(
            "https://marketplace.visualstudio.com/_apis/public/gallery/",
            &artifact(Some(PlatformTag::Win32X64)),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://marketplace.visualstudio.com/_apis/public/gallery/publishers/acme/vsextensions/widget/2.0.0/vspackage?targetPlatform=win32-x64"
        );
    }

    #[test]
    fn test_download_url_without_platform() {
        let url = download_url("http://127.0.0.1:8080", &artifact(None)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/publishers/acme/vsextensions/widget/2.0.0/vspackage"
        );
        assert!(download_url("ftp://mirror", &artifact(None)).is_err());
    }

    #[test]
    fn test_response_classification() {
        let url = "http://x";
        assert_eq!(
            validate_response(StatusCode::OK, 0, url).unwrap(),
            ResponseAction::Write(WriteMode::Truncate)
        );
        assert_eq!(
            validate_response(StatusCode::OK, 10, url).unwrap(),
            ResponseAction::Write(WriteMode::Truncate)
        );
        assert_eq!(
            validate_response(StatusCode::PARTIAL_CONTENT, 10, url).unwrap(),
            ResponseAction::Write(WriteMode::Append)
        );
        assert_eq!(
            validate_response(StatusCode::RANGE_NOT_SATISFIABLE, 10, url).unwrap(),
            ResponseAction::DiscardAndRestart
        );
        assert!(matches!(
            validate_response(StatusCode::NOT_FOUND, 0, url),
            Err(TransferError::HttpStatus { status: 404, .. })
        ));
    }
}
