//! pagecarbon — discover the assets a web page pulls in and measure their transfer size.
//!
//! The pipeline runs strictly forward: fetch page, extract asset references,
//! resolve and dedupe them, probe every asset with bounded concurrency, then
//! aggregate the byte totals into an [`AuditResult`].

pub mod audit;
pub mod batch;
pub mod dedupe;
pub mod extract;
pub mod fetch;
pub mod probe;
pub mod resolve;
#[cfg(test)]
mod test_fixtures;
pub mod types;

pub use audit::Auditor;
pub use batch::probe_all;
pub use dedupe::dedupe;
pub use extract::{extract_assets, Document, HtmlParser, ScraperParser};
pub use fetch::{BodyLength, Fetched, HeadInfo, HttpFetch, ReqwestFetcher};
pub use probe::SizeProber;
pub use resolve::resolve;
pub use types::*;
