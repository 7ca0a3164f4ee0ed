//! `pagecarbon audit <url>` — audit a single page from the command line.

use crate::config::ServerConfig;
use crate::report::{format_bytes, AuditReport};
use anyhow::{Context, Result};
use pagecarbon::Auditor;
use std::fmt::Write;

/// Run the audit command.
pub async fn run(url: &str, config: &ServerConfig, json: bool) -> Result<()> {
    let auditor = Auditor::new(config.audit.clone())?;
    let result = auditor
        .audit(url)
        .await
        .with_context(|| format!("could not audit {url}"))?;
    let report = AuditReport::build(&result, &config.coefficients);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

/// Plain-text rendering of a report.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", report.url);
    let _ = writeln!(
        out,
        "  Total:  {}  (page {} + {} assets)",
        format_bytes(report.bytes_total),
        format_bytes(report.page_bytes),
        report.assets.len()
    );
    let _ = writeln!(out, "  CO2:    {} g / 1k views", report.co2_per_k_views_g);
    let _ = writeln!(out, "  Cost:   ${:.2} / 1k views", report.cost_per_k_views_usd);

    if !report.assets.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {:<4}  {:>10}  URL", "TYPE", "SIZE");
        for asset in &report.assets {
            let size = if asset.measured {
                format_bytes(asset.bytes)
            } else {
                "unknown".to_string()
            };
            let _ = writeln!(out, "  {:<4}  {:>10}  {}", asset.kind, size, asset.url);
        }
    }
    if report.unmeasured_assets > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {} asset sizes could not be determined and count as 0 B.",
            report.unmeasured_assets
        );
    }

    if !report.tips.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Suggested fixes");
        for tip in &report.tips {
            let _ = writeln!(out, "   - {tip}");
        }
    }
    out
}
