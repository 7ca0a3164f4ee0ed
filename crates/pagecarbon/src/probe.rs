//! Best-effort transfer size of a single asset.
//!
//! A HEAD request is tried first. If it fails, is rejected, or carries no
//! usable `Content-Length`, the asset is downloaded with GET and the body
//! length is used instead. If that fails as well the size is unknown and
//! reported as zero. No further retries.

use crate::fetch::HttpFetch;
use crate::types::{ProbeOutcome, SizeSource};
use std::sync::Arc;
use tracing::debug;

/// Measures asset sizes over an [`HttpFetch`].
#[derive(Clone)]
pub struct SizeProber {
    fetcher: Arc<dyn HttpFetch>,
}

impl SizeProber {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self { fetcher }
    }

    /// Probe `url`. Never fails: every error path yields [`ProbeOutcome::unknown`].
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.fetcher.head(url).await {
            Ok(head) if head.is_success() => {
                if let Some(len) = head.content_length {
                    debug!(url, bytes = len, "size from HEAD content-length");
                    return ProbeOutcome::measured(len, SizeSource::ContentLength);
                }
                debug!(url, "HEAD without content-length, falling back to GET");
            }
            Ok(head) => debug!(url, status = head.status, "HEAD rejected, falling back to GET"),
            Err(e) => debug!(url, error = %e, "HEAD failed, falling back to GET"),
        }

        match self.fetcher.get_len(url).await {
            Ok(resp) if resp.is_success() => {
                debug!(url, bytes = resp.bytes, "size from GET body");
                ProbeOutcome::measured(resp.bytes, SizeSource::Body)
            }
            Ok(resp) => {
                debug!(url, status = resp.status, "GET rejected, size unknown");
                ProbeOutcome::unknown()
            }
            Err(e) => {
                debug!(url, error = %e, "GET failed, size unknown");
                ProbeOutcome::unknown()
            }
        }
    }
}
