//! Core data types for page audits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of simultaneously in-flight size probes.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Default cap on `<img>` references taken from one page.
pub const DEFAULT_MAX_IMAGES: usize = 20;

/// The category an asset was discovered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stylesheet,
    Script,
    Image,
}

impl AssetKind {
    /// Short label used in reports (`css`, `js`, `img`).
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Stylesheet => "css",
            AssetKind::Script => "js",
            AssetKind::Image => "img",
        }
    }
}

/// A raw reference pulled out of the HTML, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub kind: AssetKind,
    pub raw_source: String,
}

/// A reference resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub kind: AssetKind,
    pub url: String,
}

/// Where a probed size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSource {
    /// `Content-Length` reported by a HEAD request.
    ContentLength,
    /// Bytes actually transferred by a GET request.
    Body,
    /// Both probes failed; size is reported as zero.
    Unknown,
}

/// Result of probing one asset. Probing never fails; a failed probe is
/// `Unknown` with zero bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub bytes: u64,
    pub source: SizeSource,
}

impl ProbeOutcome {
    pub fn measured(bytes: u64, source: SizeSource) -> Self {
        Self { bytes, source }
    }

    pub fn unknown() -> Self {
        Self {
            bytes: 0,
            source: SizeSource::Unknown,
        }
    }

    pub fn success(&self) -> bool {
        self.source != SizeSource::Unknown
    }
}

/// One measured asset of an audited page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub kind: AssetKind,
    pub url: String,
    /// Transfer size in bytes; zero when the size could not be determined.
    pub bytes: u64,
    /// False when `bytes` is the zero sentinel from a failed probe.
    pub measured: bool,
}

/// The outcome of a full page audit. Immutable once built; `total_bytes`
/// is always `page_bytes` plus the sum of every asset's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditResult {
    source_url: String,
    page_bytes: u64,
    assets: Vec<AssetRecord>,
    total_bytes: u64,
}

impl AuditResult {
    /// Build a result, computing the total. Returns `None` on `u64` overflow.
    pub fn new(source_url: String, page_bytes: u64, assets: Vec<AssetRecord>) -> Option<Self> {
        let total_bytes = assets
            .iter()
            .try_fold(page_bytes, |acc, a| acc.checked_add(a.bytes))?;
        Some(Self {
            source_url,
            page_bytes,
            assets,
            total_bytes,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn page_bytes(&self) -> u64 {
        self.page_bytes
    }

    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Number of assets whose size could not be determined.
    pub fn unmeasured_count(&self) -> usize {
        self.assets.iter().filter(|a| !a.measured).count()
    }
}

/// Tunables for an audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Upper bound on simultaneously in-flight size probes.
    pub concurrency: usize,
    /// Only the first `max_images` `<img>` references are measured.
    pub max_images: usize,
    /// Bound on every individual network call.
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_images: DEFAULT_MAX_IMAGES,
            timeout: Duration::from_secs(20),
            max_redirects: 10,
            user_agent: concat!("pagecarbon/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Errors that abort an audit.
#[derive(thiserror::Error, Debug)]
pub enum AuditError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch {url}: {reason}")]
    PageFetch { url: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuditError {
    /// Stable machine-readable label for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::InvalidInput(_) => "invalid_input",
            AuditError::PageFetch { .. } => "page_fetch",
            AuditError::Internal(_) => "internal",
        }
    }
}

/// Errors from the HTTP capability. Never surfaced by asset probing.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            FetchError::Client(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
