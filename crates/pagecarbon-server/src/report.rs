//! Turn an [`AuditResult`] into the user-facing report: CO2 and cost
//! estimates, per-asset rows, and improvement tips.

use pagecarbon::{AssetKind, AuditResult};
use serde::Serialize;
use url::{Host, Url};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Images above this size get a compression tip.
pub const LARGE_IMAGE_BYTES: u64 = 300 * KIB;
/// Scripts above this size get a defer tip.
pub const LARGE_SCRIPT_BYTES: u64 = 200 * KIB;
/// Pages above this total get a lazy-loading tip.
pub const HEAVY_PAGE_BYTES: u64 = 2 * MIB;

/// Conversion factors from transferred bytes to energy, carbon and cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    #[serde(rename = "ENERGY_KWH_PER_GB")]
    pub energy_kwh_per_gb: f64,
    #[serde(rename = "CARBON_G_PER_KWH")]
    pub carbon_g_per_kwh: f64,
    #[serde(rename = "COST_USD_PER_GB")]
    pub cost_usd_per_gb: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            energy_kwh_per_gb: 0.81,
            carbon_g_per_kwh: 475.0,
            cost_usd_per_gb: 0.08,
        }
    }
}

impl Coefficients {
    /// Grams of CO2 for transferring `bytes` once.
    pub fn co2_grams(&self, bytes: u64) -> f64 {
        gigabytes(bytes) * self.energy_kwh_per_gb * self.carbon_g_per_kwh
    }

    /// Data cost in USD for transferring `bytes` once.
    pub fn cost_usd(&self, bytes: u64) -> f64 {
        gigabytes(bytes) * self.cost_usd_per_gb
    }
}

fn gigabytes(bytes: u64) -> f64 {
    bytes as f64 / GIB as f64
}

/// One row of the asset table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAsset {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
    pub bytes: u64,
    pub measured: bool,
}

/// The audit report returned by the API and printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub ok: bool,
    pub url: String,
    pub bytes_total: u64,
    pub page_bytes: u64,
    /// Grams of CO2 per 1000 page views, rounded.
    #[serde(rename = "co2PerKViews_g")]
    pub co2_per_k_views_g: u64,
    #[serde(rename = "costPerKViews_usd")]
    pub cost_per_k_views_usd: f64,
    pub assets: Vec<ReportAsset>,
    pub unmeasured_assets: usize,
    pub tips: Vec<String>,
    pub assumptions: Coefficients,
}

impl AuditReport {
    pub fn build(result: &AuditResult, coefficients: &Coefficients) -> Self {
        let total = result.total_bytes();
        Self {
            ok: true,
            url: result.source_url().to_string(),
            bytes_total: total,
            page_bytes: result.page_bytes(),
            co2_per_k_views_g: (coefficients.co2_grams(total) * 1000.0).round() as u64,
            cost_per_k_views_usd: coefficients.cost_usd(total) * 1000.0,
            assets: result
                .assets()
                .iter()
                .map(|a| ReportAsset {
                    kind: a.kind.label(),
                    url: a.url.clone(),
                    bytes: a.bytes,
                    measured: a.measured,
                })
                .collect(),
            unmeasured_assets: result.unmeasured_count(),
            tips: tips(result),
            assumptions: *coefficients,
        }
    }
}

/// Improvement suggestions for an audited page.
pub fn tips(result: &AuditResult) -> Vec<String> {
    let mut tips = Vec::new();

    let count_over = |kind: AssetKind, limit: u64| {
        result
            .assets()
            .iter()
            .filter(|a| a.kind == kind && a.bytes > limit)
            .count()
    };

    let large_images = count_over(AssetKind::Image, LARGE_IMAGE_BYTES);
    if large_images > 0 {
        tips.push(format!("Compress {large_images} large images (>300KB)."));
    }
    let large_scripts = count_over(AssetKind::Script, LARGE_SCRIPT_BYTES);
    if large_scripts > 0 {
        tips.push(format!("Reduce or defer {large_scripts} large JS files (>200KB)."));
    }
    if result.total_bytes() > HEAVY_PAGE_BYTES {
        tips.push(
            "Overall page >2MB. Consider lazy-loading and next-gen image formats.".to_string(),
        );
    }
    if let Some(domain) = registrable_domain(result.source_url()) {
        tips.push(format!(
            "Consider a CDN for {domain} and enable compression (gzip/brotli)."
        ));
    }
    tips
}

/// Registrable domain of `page_url`'s host per the Public Suffix List.
///
/// `None` for IP literals, hosts that are themselves public suffixes
/// (including single-label hosts like `localhost`) and unparsable URLs.
pub fn registrable_domain(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let Some(Host::Domain(host)) = url.host() else {
        return None;
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    psl::domain_str(&host).map(str::to_string)
}

/// Human-readable byte size (`512 B`, `1.5 KB`, `2.25 MB`).
pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", b / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2} MB", b / MIB as f64)
    } else {
        format!("{:.2} GB", b / GIB as f64)
    }
}
