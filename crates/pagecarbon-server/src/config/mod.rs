//! Configuration loading from the environment.
//!
//! Every value has a default; an unparsable value is logged and the
//! default is used instead.

use crate::report::Coefficients;
use pagecarbon::AuditConfig;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Everything the server needs to run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub coefficients: Coefficients,
    pub audit: AuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            coefficients: Coefficients::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let coefficients = Coefficients {
            energy_kwh_per_gb: parse_or(
                &lookup,
                "ENERGY_KWH_PER_GB",
                defaults.coefficients.energy_kwh_per_gb,
            ),
            carbon_g_per_kwh: parse_or(
                &lookup,
                "CARBON_G_PER_KWH",
                defaults.coefficients.carbon_g_per_kwh,
            ),
            cost_usd_per_gb: parse_or(
                &lookup,
                "COST_USD_PER_GB",
                defaults.coefficients.cost_usd_per_gb,
            ),
        };

        let timeout_ms = parse_or(
            &lookup,
            "PAGECARBON_TIMEOUT_MS",
            defaults.audit.timeout.as_millis() as u64,
        );
        let audit = AuditConfig {
            concurrency: parse_or(
                &lookup,
                "PAGECARBON_CONCURRENCY",
                defaults.audit.concurrency,
            )
            .max(1),
            max_images: parse_or(&lookup, "PAGECARBON_MAX_IMAGES", defaults.audit.max_images),
            timeout: Duration::from_millis(timeout_ms),
            ..defaults.audit
        };

        Self {
            host: lookup("PAGECARBON_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            coefficients,
            audit,
        }
    }

    /// `host:port` to bind the REST API on.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}, using default");
                default
            }
        },
        None => default,
    }
}
