//! Resolve-only runs: report what would be downloaded

use futures::stream::{self, StreamExt};
use vsixget_catalog::CatalogQuery;
use vsixget_events::EventEmitter;
use vsixget_net::download_url;
use vsixget_types::ExtensionRef;

use crate::types::{ResolutionEntry, ResolutionReport};
use crate::OpsCtx;

/// Resolve every reference without transferring anything
///
/// Up to `ctx.jobs` catalog queries run at once; entries keep input order.
pub async fn resolve<C>(ctx: &OpsCtx<C>, refs: &[ExtensionRef]) -> ResolutionReport
where
    C: CatalogQuery,
{
    ctx.emit_operation_started("resolve");

    let gallery_url = ctx.downloader.gallery_url();
    let entries: Vec<ResolutionEntry> = stream::iter(refs)
        .map(|reference| async move {
            let label = reference.label();
            match ctx.resolver.resolve(reference).await {
                Ok(artifact) => match download_url(gallery_url, &artifact) {
                    Ok(url) => ResolutionEntry {
                        reference: label,
                        label: Some(artifact.label()),
                        download_url: Some(url.to_string()),
                        artifact: Some(artifact),
                        error: None,
                    },
                    Err(e) => ResolutionEntry {
                        reference: label,
                        label: Some(artifact.label()),
                        download_url: None,
                        artifact: Some(artifact),
                        error: Some(e.into()),
                    },
                },
                Err(e) => ResolutionEntry {
                    reference: label,
                    artifact: None,
                    label: None,
                    download_url: None,
                    error: Some(e.into()),
                },
            }
        })
        .buffered(ctx.jobs)
        .collect()
        .await;

    let report = ResolutionReport { entries };
    ctx.emit_operation_completed("resolve", report.is_success());
    report
}
