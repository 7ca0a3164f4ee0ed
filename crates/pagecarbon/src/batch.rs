//! Probe many assets with a bounded number of requests in flight.

use crate::probe::SizeProber;
use crate::types::ProbeOutcome;
use futures::stream::{self, StreamExt};

/// Probe every URL with at most `concurrency` probes in flight.
///
/// The result is index-aligned with `urls` and always has the same length.
/// Probes finish in any order; individual failures are already absorbed
/// by the prober and never cancel siblings. A limit of zero is treated as one.
pub async fn probe_all(
    prober: &SizeProber,
    urls: &[String],
    concurrency: usize,
) -> Vec<ProbeOutcome> {
    // Owned futures keep the returned future Send.
    let probes: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| {
            let prober = prober.clone();
            async move { prober.probe(&url).await }
        })
        .collect();

    stream::iter(probes)
        .buffered(concurrency.max(1))
        .collect()
        .await
}
