//! Integration tests for the catalog client

use httpmock::prelude::*;
use serde_json::json;
use vsixget_catalog::{CatalogQuery, MarketplaceCatalog, ACCEPT_HEADER};
use vsixget_errors::{QueryError, UserFacingError};
use vsixget_events::{channel, AppEvent, ResolverEvent};
use vsixget_net::NetClient;
use vsixget_types::PlatformTag;

fn catalog(server: &MockServer) -> MarketplaceCatalog {
    MarketplaceCatalog::new(NetClient::with_defaults().unwrap(), server.base_url())
}

#[tokio::test]
async fn test_query_returns_variants_in_catalog_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/extensionquery")
            .header("accept", ACCEPT_HEADER)
            .header("content-type", "application/json")
            .json_body(json!({
                "filters": [{"criteria": [{"filterType": 7, "value": "acme.widget"}]}],
                "flags": 914
            }));
        then.status(200).json_body(json!({
            "results": [{"extensions": [{"versions": [
                {"version": "2.0.0", "targetPlatform": "linux-x64"},
                {"version": "2.0.0", "targetPlatform": "win32-x64"},
                {"version": "1.9.0"}
            ]}]}]
        }));
    });

    let entry = catalog(&server).query("acme", "widget").await.unwrap();

    mock.assert();
    assert_eq!(entry.publisher, "acme");
    let variants: Vec<_> = entry
        .versions
        .iter()
        .map(|v| (v.version.as_str(), v.platform))
        .collect();
    assert_eq!(
        variants,
        vec![
            ("2.0.0", Some(PlatformTag::LinuxX64)),
            ("2.0.0", Some(PlatformTag::Win32X64)),
            ("1.9.0", None),
        ]
    );
}

#[tokio::test]
async fn test_unknown_platform_variant_is_dropped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/extensionquery");
        then.status(200).json_body(json!({
            "results": [{"extensions": [{"versions": [
                {"version": "3.0.0", "targetPlatform": "plan9-mips"},
                {"version": "2.0.0", "targetPlatform": "undefined"}
            ]}]}]
        }));
    });
    let (tx, mut rx) = channel();

    let entry = catalog(&server)
        .with_event_sender(tx)
        .query("acme", "widget")
        .await
        .unwrap();

    assert_eq!(entry.versions.len(), 1);
    assert_eq!(entry.versions[0].platform, None);
    assert!(matches!(
        rx.try_recv(),
        Ok(AppEvent::Resolver(ResolverEvent::VariantSkipped { .. }))
    ));
}

#[tokio::test]
async fn test_non_success_status_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/extensionquery");
        then.status(500);
    });

    let err = catalog(&server).query("acme", "widget").await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::NotFound { ref extension, .. } if extension == "acme.widget"
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_missing_result_path_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/extensionquery");
        then.status(200).json_body(json!({"results": [{"extensions": []}]}));
    });

    let err = catalog(&server).query("acme", "ghost").await.unwrap_err();
    assert!(matches!(err, QueryError::NotFound { .. }));
}

#[tokio::test]
async fn test_garbage_body_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/extensionquery");
        then.status(200).body("<html>maintenance</html>");
    });

    let err = catalog(&server).query("acme", "widget").await.unwrap_err();
    assert!(matches!(err, QueryError::NotFound { .. }));
}

#[tokio::test]
async fn test_unreachable_catalog_is_transport_error() {
    // Nothing listens on port 9 on test machines
    let catalog =
        MarketplaceCatalog::new(NetClient::with_defaults().unwrap(), "http://127.0.0.1:9");
    let err = catalog.query("acme", "widget").await.unwrap_err();
    assert!(matches!(err, QueryError::Transport { .. } | QueryError::Timeout { .. }));
    assert!(err.is_retryable());
}
