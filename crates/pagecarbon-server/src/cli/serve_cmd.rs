//! `pagecarbon serve` — run the REST API.

use crate::config::ServerConfig;
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Run the serve command.
pub async fn run(config: ServerConfig) -> Result<()> {
    info!("starting pagecarbon v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "assumptions: {} kWh/GB, {} g/kWh, ${}/GB",
        config.coefficients.energy_kwh_per_gb,
        config.coefficients.carbon_g_per_kwh,
        config.coefficients.cost_usd_per_gb
    );
    let state = Arc::new(AppState::from_config(&config)?);
    rest::start(&config, state).await
}
