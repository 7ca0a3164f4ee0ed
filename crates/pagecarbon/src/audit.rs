//! Audit orchestration: validate, fetch page, extract, resolve and dedupe,
//! probe every asset, aggregate.
//!
//! Only an invalid page URL or a failed page fetch abort an audit. Asset
//! probe failures are absorbed as zero-byte, unmeasured records.

use crate::batch::probe_all;
use crate::dedupe::dedupe;
use crate::extract::{extract_assets, HtmlParser, ScraperParser};
use crate::fetch::{Fetched, HttpFetch, ReqwestFetcher};
use crate::probe::SizeProber;
use crate::resolve::resolve_against;
use crate::types::{AssetRecord, AuditConfig, AuditError, AuditResult, ResolvedAsset};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Runs page audits. Holds no per-audit state, so one instance can serve
/// any number of concurrent audits.
#[derive(Clone)]
pub struct Auditor {
    fetcher: Arc<dyn HttpFetch>,
    parser: Arc<dyn HtmlParser>,
    prober: SizeProber,
    config: AuditConfig,
}

impl Auditor {
    /// Auditor over a real HTTP client and the `scraper` HTML parser.
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        let fetcher = ReqwestFetcher::new(&config)
            .map_err(|e| AuditError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_parts(
            Arc::new(fetcher),
            Arc::new(ScraperParser),
            config,
        ))
    }

    /// Auditor over caller-supplied capabilities.
    pub fn with_parts(
        fetcher: Arc<dyn HttpFetch>,
        parser: Arc<dyn HtmlParser>,
        config: AuditConfig,
    ) -> Self {
        let prober = SizeProber::new(Arc::clone(&fetcher));
        Self {
            fetcher,
            parser,
            prober,
            config,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit the page at `page_url`.
    pub async fn audit(&self, page_url: &str) -> Result<AuditResult, AuditError> {
        let page_url = page_url.trim();
        let base = validate(page_url)?;

        let page = self.fetch_page(base.as_str()).await?;
        let page_bytes = page.body.len() as u64;
        debug!("fetched {page_url}: {page_bytes} bytes");

        // Blocking task: scraper types are not Send
        let parser = Arc::clone(&self.parser);
        let max_images = self.config.max_images;
        let html = String::from_utf8_lossy(&page.body).into_owned();
        let references =
            tokio::task::spawn_blocking(move || extract_assets(parser.as_ref(), &html, max_images))
                .await
                .map_err(|e| AuditError::Internal(format!("HTML extraction failed: {e}")))?;

        let discovered = references.len();
        let resolved: Vec<ResolvedAsset> = references
            .into_iter()
            .filter_map(|r| {
                let url = resolve_against(&base, &r.raw_source)?;
                Some(ResolvedAsset { kind: r.kind, url })
            })
            .collect();
        let assets = dedupe(resolved);
        debug!(
            "{page_url}: {discovered} references, {} unique assets",
            assets.len()
        );

        let urls: Vec<String> = assets.iter().map(|a| a.url.clone()).collect();
        let outcomes = probe_all(&self.prober, &urls, self.config.concurrency).await;

        let records: Vec<AssetRecord> = assets
            .into_iter()
            .zip(outcomes)
            .map(|(asset, outcome)| AssetRecord {
                kind: asset.kind,
                url: asset.url,
                bytes: outcome.bytes,
                measured: outcome.success(),
            })
            .collect();

        let result = AuditResult::new(page_url.to_string(), page_bytes, records)
            .ok_or_else(|| AuditError::Internal("byte total overflowed".to_string()))?;

        info!(
            "audited {page_url}: {} assets ({} unmeasured), {} bytes total",
            result.assets().len(),
            result.unmeasured_count(),
            result.total_bytes()
        );
        Ok(result)
    }

    async fn fetch_page(&self, page_url: &str) -> Result<Fetched, AuditError> {
        let page = self.fetcher.get(page_url).await.map_err(|e| {
            warn!("page fetch failed for {page_url}: {e}");
            AuditError::PageFetch {
                url: page_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !page.is_success() {
            warn!("page fetch for {page_url} returned HTTP {}", page.status);
            return Err(AuditError::PageFetch {
                url: page_url.to_string(),
                reason: format!("HTTP status {}", page.status),
            });
        }
        Ok(page)
    }
}

/// Accept only http(s) URLs. Runs before any network activity.
fn validate(page_url: &str) -> Result<Url, AuditError> {
    let lower = page_url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(AuditError::InvalidInput(format!(
            "expected an http(s) URL, got {page_url:?}"
        )));
    }
    Url::parse(page_url).map_err(|e| AuditError::InvalidInput(format!("{page_url:?}: {e}")))
}
