//! Integration tests for the transfer engine

#[cfg(test)]
mod tests {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use httpmock::prelude::*;
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;
    use vsixget_errors::{Error, TransferError};
    use vsixget_events::{channel, AppEvent, DownloadEvent};
    use vsixget_net::*;
    use vsixget_types::{PlatformTag, ResolvedArtifact};

    const PAYLOAD: &[u8] = b"PK\x03\x04 extension.vsixmanifest and friends";
    const PACKAGE_PATH: &str = "/publishers/acme/vsextensions/widget/1.0.0/vspackage";

    fn artifact(platform: Option<PlatformTag>) -> ResolvedArtifact {
        ResolvedArtifact {
            publisher: "acme".to_string(),
            package: "widget".to_string(),
            version: "1.0.0".to_string(),
            platform,
        }
    }

    fn downloader(server: &MockServer, retry_config: RetryConfig) -> ArtifactDownloader {
        let config = TransferConfig {
            retry_config,
            chunk_timeout: Duration::from_secs(5),
        };
        ArtifactDownloader::new(NetClient::with_defaults().unwrap(), server.base_url(), config)
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn assert_no_temporaries(dir: &Path) {
        let leftovers: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| {
                name.ends_with(".part") || name.ends_with(".headers.json") || name.ends_with(".tmp")
            })
            .collect();
        assert!(leftovers.is_empty(), "leftover temporaries: {leftovers:?}");
    }

    #[tokio::test]
    async fn test_fresh_download() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200).body(PAYLOAD);
        });
        let temp = tempdir().unwrap();
        let (tx, mut rx) = channel();

        let outcome = downloader(&server, RetryConfig::none())
            .with_event_sender(tx)
            .fetch(&artifact(None), temp.path(), true)
            .await;

        mock.assert();
        assert!(outcome.success, "{:?}", outcome.error);
        assert!(!outcome.from_cache);
        assert_eq!(outcome.artifact_label, "acme.widget@1.0.0");
        let path = outcome.output_path.unwrap();
        assert_eq!(path, temp.path().join("acme.widget@1.0.0.vsix"));
        assert_eq!(std::fs::read(&path).unwrap(), PAYLOAD);
        assert_no_temporaries(temp.path());

        let mut saw_start = false;
        let mut saw_complete = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Download(DownloadEvent::Started { resume_from, .. }) => {
                    assert_eq!(resume_from, 0);
                    saw_start = true;
                }
                AppEvent::Download(DownloadEvent::Completed { bytes, .. }) => {
                    assert_eq!(bytes, PAYLOAD.len() as u64);
                    saw_complete = true;
                }
                _ => {}
            }
        }
        assert!(saw_start);
        assert!(saw_complete);
    }

    #[tokio::test]
    async fn test_cache_hit_makes_no_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200).body(b"new bytes");
        });
        let temp = tempdir().unwrap();
        let existing = temp.path().join("acme.widget@1.0.0.vsix");
        std::fs::write(&existing, b"already here").unwrap();
        let (tx, mut rx) = channel();

        let outcome = downloader(&server, RetryConfig::none())
            .with_event_sender(tx)
            .fetch(&artifact(None), temp.path(), true)
            .await;

        mock.assert_hits(0);
        assert!(outcome.success);
        assert!(outcome.from_cache);
        assert_eq!(std::fs::read(&existing).unwrap(), b"already here");
        assert!(matches!(
            rx.try_recv(),
            Ok(AppEvent::Download(DownloadEvent::CacheHit { .. }))
        ));
    }

    #[tokio::test]
    async fn test_uncached_run_replaces_existing_file_and_stale_staging() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200).body(PAYLOAD);
        });
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("acme.widget@1.0.0.vsix"), b"old").unwrap();
        std::fs::write(temp.path().join("acme.widget@1.0.0.vsix.part"), b"stale").unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), false)
            .await;

        mock.assert_hits(1);
        assert!(outcome.success);
        assert_eq!(std::fs::read(outcome.output_path.unwrap()).unwrap(), PAYLOAD);
        assert_no_temporaries(temp.path());
    }

    #[tokio::test]
    async fn test_gzip_body_is_stored_decoded() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200)
                .header("content-encoding", "gzip")
                .body(gzip(PAYLOAD));
        });
        let temp = tempdir().unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(std::fs::read(outcome.output_path.unwrap()).unwrap(), PAYLOAD);
        assert_no_temporaries(temp.path());
    }

    #[tokio::test]
    async fn test_resume_appends_partial_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH).header("range", "bytes=4-");
            then.status(206)
                .header(
                    "content-range",
                    format!("bytes 4-{}/{}", PAYLOAD.len() - 1, PAYLOAD.len()),
                )
                .body(&PAYLOAD[4..]);
        });
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("acme.widget@1.0.0.vsix.part"), &PAYLOAD[..4]).unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        mock.assert();
        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(std::fs::read(outcome.output_path.unwrap()).unwrap(), PAYLOAD);
        assert_no_temporaries(temp.path());
    }

    #[tokio::test]
    async fn test_ignored_range_restarts_from_zero() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH).header("range", "bytes=5-");
            then.status(200).body(PAYLOAD);
        });
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("acme.widget@1.0.0.vsix.part"), b"junk!").unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(std::fs::read(outcome.output_path.unwrap()).unwrap(), PAYLOAD);
    }

    #[tokio::test]
    async fn test_not_found_leaves_no_final_file() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(404);
        });
        let temp = tempdir().unwrap();

        let outcome = downloader(&server, RetryConfig::default())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        // 404 is not worth retrying
        mock.assert_hits(1);
        assert!(!outcome.success);
        assert!(outcome.output_path.is_none());
        assert!(matches!(
            outcome.error,
            Some(Error::Transfer(TransferError::HttpStatus { status: 404, .. }))
        ));
        assert!(!temp.path().join("acme.widget@1.0.0.vsix").exists());
        assert_no_temporaries(temp.path());
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(503);
        });
        let temp = tempdir().unwrap();
        let retry = RetryConfig {
            max_retries: 2,
            initial_delay: Duration::ZERO,
            ..RetryConfig::default()
        };

        let outcome = downloader(&server, retry)
            .fetch(&artifact(None), temp.path(), true)
            .await;

        mock.assert_hits(3);
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_corrupt_encoding_keeps_staging_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200).header("content-encoding", "gzip").body(PAYLOAD);
        });
        let temp = tempdir().unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        assert!(matches!(
            outcome.error,
            Some(Error::Transfer(TransferError::Decode { .. }))
        ));
        assert!(!temp.path().join("acme.widget@1.0.0.vsix").exists());
        assert!(temp.path().join("acme.widget@1.0.0.vsix.part").exists());
        assert!(!temp.path().join("acme.widget@1.0.0.vsix.headers.json").exists());
        assert!(!temp.path().join("acme.widget@1.0.0.vsix.tmp").exists());
    }

    #[tokio::test]
    async fn test_platform_is_sent_as_query_parameter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(PACKAGE_PATH)
                .query_param("targetPlatform", "linux-x64");
            then.status(200).body(PAYLOAD);
        });
        let temp = tempdir().unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(Some(PlatformTag::LinuxX64)), temp.path(), true)
            .await;

        mock.assert();
        assert_eq!(
            outcome.output_path.unwrap(),
            temp.path().join("acme.widget@1.0.0=linux-x64.vsix")
        );
    }

    fn has_range_header(req: &HttpMockRequest) -> bool {
        req.headers.as_ref().is_some_and(|headers| {
            headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("range"))
        })
    }

    #[tokio::test]
    async fn test_stalled_server_times_out_after_retries() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(200).body(PAYLOAD).delay(Duration::from_secs(3));
        });
        let temp = tempdir().unwrap();
        let client = NetClient::new(&NetConfig {
            timeout: Duration::from_millis(300),
            ..NetConfig::default()
        })
        .unwrap();
        let retry = RetryConfig {
            max_retries: 1,
            initial_delay: Duration::ZERO,
            ..RetryConfig::default()
        };
        let config = TransferConfig {
            retry_config: retry,
            chunk_timeout: Duration::from_secs(5),
        };

        let outcome = ArtifactDownloader::new(client, server.base_url(), config)
            .fetch(&artifact(None), temp.path(), true)
            .await;

        mock.assert_hits(2);
        assert!(!outcome.success);
        assert!(matches!(
            outcome.error,
            Some(Error::Transfer(TransferError::Timeout { .. }))
        ));
        assert!(!temp.path().join("acme.widget@1.0.0.vsix").exists());
    }

    #[tokio::test]
    async fn test_unsatisfiable_range_restarts_without_range() {
        let server = MockServer::start();
        let ranged = server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH).header("range", "bytes=11-");
            then.status(416);
        });
        let fresh = server.mock(|when, then| {
            when.method(GET)
                .path(PACKAGE_PATH)
                .matches(|req: &HttpMockRequest| !has_range_header(req));
            then.status(200).body(PAYLOAD);
        });
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("acme.widget@1.0.0.vsix.part"), b"stale-bytes").unwrap();
        let (tx, mut rx) = channel();

        let outcome = downloader(&server, RetryConfig::none())
            .with_event_sender(tx)
            .fetch(&artifact(None), temp.path(), true)
            .await;

        ranged.assert_hits(1);
        fresh.assert_hits(1);
        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(std::fs::read(outcome.output_path.unwrap()).unwrap(), PAYLOAD);
        assert_no_temporaries(temp.path());

        let mut restarted = false;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Download(DownloadEvent::Restarted { status, .. }) = event {
                assert_eq!(status, 416);
                restarted = true;
            }
        }
        assert!(restarted);
    }

    #[tokio::test]
    async fn test_failed_cleanup_keeps_original_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PACKAGE_PATH);
            then.status(404);
        });
        let temp = tempdir().unwrap();
        // A directory where the temporary file belongs cannot be removed as a file
        let blocker = temp.path().join("acme.widget@1.0.0.vsix.tmp");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let outcome = downloader(&server, RetryConfig::none())
            .fetch(&artifact(None), temp.path(), true)
            .await;

        assert!(matches!(
            outcome.error,
            Some(Error::Transfer(TransferError::HttpStatus { status: 404, .. }))
        ));
        assert!(blocker.is_dir());
    }
}
